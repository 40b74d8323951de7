//! profiles.json の読み込みとプロバイダ解決

use crate::domain::ProviderName;
use crate::error::Error;
use crate::llm::config::{ProfilesConfig, ProviderTypeKind};
use crate::llm::factory::ProviderType;
use crate::ports::outbound::{EnvResolver, FileSystem};

/// 解決済みプロバイダ（ProviderType + オプション）
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（例: "local", "gemini"）。エラー表示用
    pub profile_name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// profiles.json を読み込む。ファイルが無ければ Ok(None)、JSON が壊れていれば Err（メッセージにパス含める）
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
) -> Result<Option<ProfilesConfig>, Error> {
    let path = env.resolve_profiles_config_path()?;
    if !fs.exists(path.as_path()) {
        return Ok(None);
    }
    let contents = fs.read_to_string(path.as_path())?;
    ProfilesConfig::parse(&contents)
        .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))
        .map(Some)
}

fn provider_type_kind_to_provider_type(k: ProviderTypeKind) -> ProviderType {
    match k {
        ProviderTypeKind::Gemini => ProviderType::Gemini,
        ProviderTypeKind::Openai => ProviderType::OpenAiCompat,
        ProviderTypeKind::OpenaiCompat => ProviderType::OpenAiCompat,
        ProviderTypeKind::Echo => ProviderType::Echo,
    }
}

/// 利用可能なビルトインプロバイダ名
fn builtin_provider_names() -> &'static [&'static str] {
    &["gemini", "gpt", "openai", "openai_compat", "echo"]
}

/// 利用可能なプロファイル名の一覧とデフォルト名を返す。
/// ビルトイン + cfg.providers のキーをソート・重複除去したものと、
/// default_provider（未設定時は "gemini"）のペア。
pub fn list_available_profiles(cfg: Option<&ProfilesConfig>) -> (Vec<String>, Option<String>) {
    let mut names: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        for k in cfg.providers.keys() {
            if !names.contains(k) {
                names.push(k.clone());
            }
        }
    }
    names.sort();
    let default = cfg
        .and_then(|c| c.default_provider.clone())
        .or_else(|| Some("gemini".to_string()));
    (names, default)
}

/// 要求されたプロバイダ名（None の場合は default）と ProfilesConfig から ResolvedProvider を解決する。
/// 不明なプロバイダの場合は Error::invalid_argument（is_usage == true）で利用可能一覧を返す。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let effective_name: &str = requested.map(|r| r.as_ref()).unwrap_or_else(|| {
        cfg.and_then(|c| c.default_provider.as_deref())
            .unwrap_or("gemini")
    });

    // 1) cfg.providers に名前があればそれを優先
    if let Some(cfg) = cfg {
        if let Some(profile) = cfg.providers.get(effective_name) {
            let provider_type = provider_type_kind_to_provider_type(profile.type_);
            return Ok(ResolvedProvider {
                profile_name: effective_name.to_string(),
                provider_type,
                base_url: profile.base_url.clone(),
                model: profile.model.clone(),
                api_key_env: profile.api_key_env.clone(),
                temperature: profile.temperature,
                max_tokens: profile.max_tokens,
            });
        }
    }

    // 2) ビルトイン (ProviderType::from_str) を試す
    if let Some(provider_type) = ProviderType::from_str(effective_name) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
            max_tokens: None,
        });
    }

    // 3) どれも無ければ usage エラー
    let mut available: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        for k in cfg.providers.keys() {
            if !available.contains(k) {
                available.push(k.clone());
            }
        }
    }
    available.sort();
    Err(Error::invalid_argument(format!(
        "Unknown provider: '{}'. Available: {}",
        effective_name,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderName;
    use crate::llm::config::{ProfilesConfig, ProviderProfile, ProviderTypeKind};

    #[test]
    fn test_resolve_provider_no_cfg_requested_none() {
        let r = resolve_provider(None, None).unwrap();
        assert_eq!(r.profile_name, "gemini");
        assert_eq!(r.provider_type, ProviderType::Gemini);
        assert!(r.model.is_none());
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_gemini() {
        let name = ProviderName::new("gemini");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::Gemini);
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_gpt() {
        let name = ProviderName::new("gpt");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::OpenAiCompat);
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_echo() {
        let name = ProviderName::new("echo");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::Echo);
    }

    #[test]
    fn test_resolve_provider_no_cfg_unknown() {
        let name = ProviderName::new("unknown_provider");
        let e = resolve_provider(Some(&name), None).unwrap_err();
        assert!(e.is_usage());
        assert!(e.to_string().contains("Unknown provider"));
        assert!(e.to_string().contains("unknown_provider"));
        assert!(e.to_string().contains("Available"));
    }

    #[test]
    fn test_resolve_provider_cfg_default_provider() {
        let cfg = ProfilesConfig {
            default_provider: Some("my_openai".to_string()),
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "my_openai".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::Openai,
                        base_url: Some("https://my.api/v1".to_string()),
                        model: Some("gpt-4".to_string()),
                        api_key_env: Some("MY_KEY".to_string()),
                        temperature: Some(0.7),
                        max_tokens: Some(4096),
                    },
                );
                m
            },
        };
        let r = resolve_provider(None, Some(&cfg)).unwrap();
        assert_eq!(r.profile_name, "my_openai");
        assert_eq!(r.provider_type, ProviderType::OpenAiCompat);
        assert_eq!(r.base_url.as_deref(), Some("https://my.api/v1"));
        assert_eq!(r.model.as_deref(), Some("gpt-4"));
        assert_eq!(r.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(r.temperature, Some(0.7));
        assert_eq!(r.max_tokens, Some(4096));
    }

    #[test]
    fn test_resolve_provider_cfg_requested_overrides_default() {
        let cfg = ProfilesConfig {
            default_provider: Some("gemini".to_string()),
            providers: std::collections::HashMap::new(),
        };
        let name = ProviderName::new("echo");
        let r = resolve_provider(Some(&name), Some(&cfg)).unwrap();
        assert_eq!(r.provider_type, ProviderType::Echo);
    }

    #[test]
    fn test_resolve_provider_cfg_custom_name() {
        let cfg = ProfilesConfig {
            default_provider: None,
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "custom_gemini".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::Gemini,
                        base_url: None,
                        model: Some("gemini-2.0".to_string()),
                        api_key_env: None,
                        temperature: None,
                        max_tokens: None,
                    },
                );
                m
            },
        };
        let name = ProviderName::new("custom_gemini");
        let r = resolve_provider(Some(&name), Some(&cfg)).unwrap();
        assert_eq!(r.provider_type, ProviderType::Gemini);
        assert_eq!(r.model.as_deref(), Some("gemini-2.0"));
    }

    #[test]
    fn test_list_available_profiles_no_cfg() {
        let (names, default) = list_available_profiles(None);
        assert!(names.contains(&"gemini".to_string()));
        assert!(names.contains(&"echo".to_string()));
        assert_eq!(default.as_deref(), Some("gemini"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_list_available_profiles_with_cfg() {
        let cfg = ProfilesConfig {
            default_provider: Some("local".to_string()),
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "local".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::OpenaiCompat,
                        base_url: Some("http://localhost:11434/v1".to_string()),
                        model: None,
                        api_key_env: None,
                        temperature: None,
                        max_tokens: None,
                    },
                );
                m
            },
        };
        let (names, default) = list_available_profiles(Some(&cfg));
        assert!(names.contains(&"local".to_string()));
        assert!(names.contains(&"gemini".to_string()));
        assert_eq!(default.as_deref(), Some("local"));
    }

    #[test]
    fn test_resolve_provider_cfg_unknown_provider_lists_available() {
        let cfg = ProfilesConfig {
            default_provider: None,
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "my_custom".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::Echo,
                        base_url: None,
                        model: None,
                        api_key_env: None,
                        temperature: None,
                        max_tokens: None,
                    },
                );
                m
            },
        };
        let name = ProviderName::new("nonexistent");
        let e = resolve_provider(Some(&name), Some(&cfg)).unwrap_err();
        assert!(e.is_usage());
        let msg = e.to_string();
        assert!(msg.contains("Unknown provider"));
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("my_custom"));
        assert!(msg.contains("gemini"));
    }
}

use crate::domain::{Conversation, Question, SystemPrompt};
use crate::ports::outbound::{
    EnvFileLoader, InterruptChecker, ProfileLister, PromptInput, SystemPromptLoader,
    TranscriptSink,
};
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::llm::{create_provider, AnyProvider, LlmDriver, LlmEvent};
use common::ports::outbound::{now_iso8601, EnvResolver, FileSystem, Log, LogLevel, LogRecord};
use std::path::Path;
use std::sync::Arc;

// --- 責務別 Deps（usecase が定義を所有し、wiring は組み立てるだけ）

pub struct ChatDeps {
    pub io: IoDeps,
    pub model: ModelDeps,
    pub source: SourceDeps,
    pub obs: ObsDeps,
}

pub struct IoDeps {
    pub prompt_input: Arc<dyn PromptInput>,
    pub transcript: Arc<dyn TranscriptSink>,
    pub interrupt_checker: Arc<dyn InterruptChecker>,
}

pub struct ModelDeps {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub profile_lister: Arc<dyn ProfileLister>,
}

pub struct SourceDeps {
    pub system_prompt_loader: Arc<dyn SystemPromptLoader>,
    pub env_file_loader: Arc<dyn EnvFileLoader>,
}

pub struct ObsDeps {
    pub log: Arc<dyn Log>,
}

/// dagchat のユースケース（アダプター経由で I/O を行う）
pub struct ChatUseCase {
    deps: ChatDeps,
}

impl ChatUseCase {
    pub fn new(deps: ChatDeps) -> Self {
        Self { deps }
    }

    /// 現在有効なプロファイル一覧を返す（ソート済み名前リストとデフォルトプロファイル名）。
    /// 表示は CLI の責務のため、usecase はデータのみ返す。
    pub fn list_profiles(&self) -> Result<(Vec<String>, Option<String>), Error> {
        self.deps.model.profile_lister.list_profiles()
    }

    /// セッション共通の前処理: env ファイル読み込み、システムプロンプト構築、プロバイダ解決。
    /// プロバイダ構築は 1 セッションに 1 回だけ行う。
    fn prepare_session(
        &self,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
        system: Option<&str>,
        file: &Path,
        env_file: &Path,
    ) -> Result<(LlmDriver<AnyProvider>, SystemPrompt), Error> {
        self.deps.source.env_file_loader.load_if_present(env_file)?;

        let system_prompt = match system {
            Some(s) => SystemPrompt::new(s),
            None => self.deps.source.system_prompt_loader.load(file)?,
        };

        let cfg = common::llm::load_profiles_config(
            self.deps.model.fs.as_ref(),
            self.deps.model.env_resolver.as_ref(),
        )?;
        let resolved = common::llm::resolve_provider(profile, cfg.as_ref())?;
        // -m 指定はプロファイルの model より優先する
        let model_name = model
            .map(|m| m.as_ref().to_string())
            .or_else(|| resolved.model.clone());

        let mut fields = std::collections::BTreeMap::new();
        fields.insert(
            "profile".to_string(),
            serde_json::json!(resolved.profile_name.clone()),
        );
        fields.insert("model".to_string(), serde_json::json!(model_name.clone()));
        let _ = self.deps.obs.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: format!(
                "chat session started (profile: {}, model: {})",
                resolved.profile_name,
                model_name.as_deref().unwrap_or("default")
            ),
            layer: Some("usecase".to_string()),
            kind: Some("chat".to_string()),
            fields: Some(fields),
        });

        let provider = create_provider(
            resolved.provider_type,
            model_name,
            resolved.base_url,
            resolved.api_key_env,
            resolved.temperature,
            resolved.max_tokens,
        )?;
        Ok((LlmDriver::new(provider), system_prompt))
    }

    /// 1 ターン分をストリーミングで問い合わせ、差分を描画して完成テキストを返す
    fn stream_turn(
        &self,
        driver: &LlmDriver<AnyProvider>,
        query: &str,
        system_prompt: &SystemPrompt,
        history: &[common::llm::Message],
    ) -> Result<String, Error> {
        let reply = driver.query_streaming(
            query,
            Some(system_prompt.as_str()),
            history,
            &mut |event| {
                if let LlmEvent::TextDelta(ref s) = event {
                    self.deps.io.transcript.assistant_delta(s);
                }
                Ok(())
            },
        )?;
        self.deps.io.transcript.assistant_end();
        Ok(reply)
    }

    /// 一問一答: 位置引数の質問を 1 回だけ送って応答を表示する
    pub fn ask(
        &self,
        profile: Option<ProviderName>,
        model: Option<ModelName>,
        system: Option<String>,
        file: &Path,
        env_file: &Path,
        question: &Question,
    ) -> Result<i32, Error> {
        if question.trim().is_empty() {
            return Err(Error::invalid_argument("No question provided."));
        }
        let (driver, system_prompt) = self.prepare_session(
            profile.as_ref(),
            model.as_ref(),
            system.as_deref(),
            file,
            env_file,
        )?;

        self.deps.io.transcript.user_echo(question.as_ref());
        self.stream_turn(&driver, question.as_ref(), &system_prompt, &[])?;

        let _ = self.deps.obs.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "chat session finished".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("chat".to_string()),
            fields: None,
        });
        Ok(0)
    }

    /// 対話ループ: EOF・/quit・/exit・割り込みまで 1 行ずつ処理する
    pub fn chat(
        &self,
        profile: Option<ProviderName>,
        model: Option<ModelName>,
        system: Option<String>,
        file: &Path,
        env_file: &Path,
    ) -> Result<i32, Error> {
        let (driver, system_prompt) = self.prepare_session(
            profile.as_ref(),
            model.as_ref(),
            system.as_deref(),
            file,
            env_file,
        )?;

        let mut conversation = Conversation::new();
        loop {
            if self.deps.io.interrupt_checker.is_interrupted() {
                break;
            }
            let line = match self.deps.io.prompt_input.read_line()? {
                Some(l) => l,
                None => break,
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input == "/quit" || input == "/exit" {
                break;
            }
            if input == "/history" {
                self.deps.io.transcript.render_history(conversation.messages());
                continue;
            }

            conversation.push_user(input);
            // 履歴は今回の発話より前のターンのみ（query は別引数で渡す）
            let history_len = conversation.len() - 1;
            let reply = self.stream_turn(
                &driver,
                input,
                &system_prompt,
                &conversation.messages()[..history_len],
            )?;
            conversation.push_assistant(reply);
        }

        let mut fields = std::collections::BTreeMap::new();
        fields.insert("turns".to_string(), serde_json::json!(conversation.len()));
        let _ = self.deps.obs.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "chat session finished".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("chat".to_string()),
            fields: Some(fields),
        });
        Ok(0)
    }
}

//! プロバイダファクトリー
//!
//! プロバイダタイプに基づいて適切なプロバイダを作成します。

use crate::error::Error;
use crate::llm::echo::EchoProvider;
use crate::llm::events::LlmEvent;
use crate::llm::gemini::GeminiProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::{LlmProvider, Message};
use serde_json::Value;

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// Gemini
    Gemini,
    /// OpenAI Chat Completions 互換 (/chat/completions)
    OpenAiCompat,
    /// Echo（クエリを表示するだけ）
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            // "gpt" / "openai" も同じ /chat/completions ワイヤ形式なので互換プロバイダで扱う
            "gpt" | "openai" | "openai_compat" => Some(Self::OpenAiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }
}

/// プロバイダのenumラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用します。
pub enum AnyProvider {
    Gemini(GeminiProvider),
    OpenAiCompat(OpenAiCompatProvider),
    Echo(EchoProvider),
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::OpenAiCompat(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::Gemini(p) => p.make_http_request(request_json),
            Self::OpenAiCompat(p) => p.make_http_request(request_json),
            Self::Echo(p) => p.make_http_request(request_json),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::Gemini(p) => p.parse_response_text(response_json),
            Self::OpenAiCompat(p) => p.parse_response_text(response_json),
            Self::Echo(p) => p.parse_response_text(response_json),
        }
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<Value, Error> {
        match self {
            Self::Gemini(p) => p.make_request_payload(query, system_instruction, history),
            Self::OpenAiCompat(p) => p.make_request_payload(query, system_instruction, history),
            Self::Echo(p) => p.make_request_payload(query, system_instruction, history),
        }
    }

    fn stream_events(
        &self,
        request_json: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error> {
        match self {
            Self::Gemini(p) => p.stream_events(request_json, callback),
            Self::OpenAiCompat(p) => p.stream_events(request_json, callback),
            Self::Echo(p) => p.stream_events(request_json, callback),
        }
    }
}

/// プロバイダを作成する
///
/// # Arguments
/// * `provider_type` - プロバイダタイプ
/// * `model` - モデル名（オプション、デフォルト値が使用される）
/// * `base_url` - ベース URL（OpenAiCompat 用。None のときデフォルト）
/// * `api_key_env` - API キーを読む環境変数名（OpenAiCompat 用。None のとき Authorization なし）
/// * `temperature` - 温度（None のとき各プロバイダのデフォルト）
/// * `max_tokens` - 最大出力トークン数（None のとき各プロバイダのデフォルト）
pub fn create_provider(
    provider_type: ProviderType,
    model: Option<String>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> Result<AnyProvider, Error> {
    match provider_type {
        ProviderType::Gemini => {
            let provider = GeminiProvider::new(model, temperature, max_tokens)?;
            Ok(AnyProvider::Gemini(provider))
        }
        ProviderType::OpenAiCompat => {
            let provider =
                OpenAiCompatProvider::new(model, base_url, api_key_env, temperature, max_tokens)?;
            Ok(AnyProvider::OpenAiCompat(provider))
        }
        ProviderType::Echo => {
            let provider = EchoProvider::new();
            Ok(AnyProvider::Echo(provider))
        }
    }
}

//! LLMプロバイダのトレイト定義

use crate::error::Error;
use crate::llm::events::LlmEvent;
use serde_json::Value;

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（Gemini、OpenAI互換など）はこのトレイトを実装する必要があります。
pub trait LlmProvider {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Arguments
    /// * `request_json` - リクエストJSON文字列
    ///
    /// # Returns
    /// * `Ok(String)` - レスポンスJSON文字列
    /// * `Err(Error)` - エラーメッセージと終了コード
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスからテキストを抽出
    ///
    /// # Arguments
    /// * `response_json` - レスポンスJSON文字列
    ///
    /// # Returns
    /// * `Ok(Option<String>)` - 抽出したテキスト（存在しない場合はNone）
    /// * `Err(Error)` - エラーメッセージと終了コード
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `query` - ユーザークエリ
    /// * `system_instruction` - システム指示（オプション）
    /// * `history` - 会話履歴（先行するターン。`query` は含まない）
    ///
    /// # Returns
    /// * `Ok(Value)` - リクエストJSON
    /// * `Err(Error)` - エラーメッセージと終了コード
    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<Value, Error>;

    /// ストリームを LlmEvent 列に正規化してコールバックに渡す
    ///
    /// チャンク受信ごとに即コールバックし、正常終了時は最後に `Completed` を送る。
    fn stream_events(
        &self,
        request_json: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

/// メッセージ構造体（user / assistant）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

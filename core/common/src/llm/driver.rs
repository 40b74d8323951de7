//! LLMドライバーの実装
//!
//! プロバイダに依存しない共通処理を提供します。

use crate::error::Error;
use crate::llm::events::LlmEvent;
use crate::llm::provider::{LlmProvider, Message};

/// LLMドライバー
pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    /// 新しいドライバーを作成
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// LLMにクエリを送信してレスポンスを取得
    ///
    /// # Arguments
    /// * `query` - ユーザークエリ
    /// * `system_instruction` - システム指示（オプション）
    /// * `history` - 会話履歴（先行するターン）
    ///
    /// # Returns
    /// * `Ok(String)` - LLMからの応答テキスト
    /// * `Err(Error)` - エラーメッセージと終了コード
    pub fn query(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<String, Error> {
        let payload = self
            .provider
            .make_request_payload(query, system_instruction, history)?;

        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let response_json = self.provider.make_http_request(&request_json)?;

        let text = self
            .provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| Error::http("No text in response"))?;

        Ok(text)
    }

    /// ストリーミングでクエリを送信し、イベントごとにコールバックする
    ///
    /// コールバックには TextDelta / ReasoningDelta / Completed / Failed が渡る。
    /// 戻り値は TextDelta を連結した完成テキスト。
    pub fn query_streaming(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<String, Error> {
        let payload = self
            .provider
            .make_request_payload(query, system_instruction, history)?;

        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let mut full_text = String::new();
        let mut failed: Option<String> = None;
        self.provider.stream_events(&request_json, &mut |event| {
            if let LlmEvent::TextDelta(ref s) = event {
                full_text.push_str(s);
            }
            if let LlmEvent::Failed { ref message } = event {
                failed = Some(message.clone());
            }
            callback(event)
        })?;

        if let Some(message) = failed {
            return Err(Error::http(message));
        }

        Ok(full_text)
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

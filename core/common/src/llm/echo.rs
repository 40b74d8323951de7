//! Echoプロバイダの実装
//!
//! このプロバイダは実際にLLM APIを呼び出さず、クエリを表示するだけです。
//! デバッグやテスト用に使用します。

use crate::error::Error;
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::provider::{LlmProvider, Message};
use serde_json::{json, Value};
use std::thread;
use std::time::Duration;

/// Echoプロバイダ
pub struct EchoProvider;

impl EchoProvider {
    /// 新しいEchoプロバイダを作成
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        // クエリを表示
        println!("[Echo Provider] Request JSON:");
        println!("{}", request_json);

        // ダミーのレスポンスを返す（実際のAPI呼び出しは行わない）
        Ok(r#"{"echo": "This is a dummy response from echo provider"}"#.to_string())
    }

    fn parse_response_text(&self, _response_json: &str) -> Result<Option<String>, Error> {
        // Echoプロバイダは常に固定のメッセージを返す
        Ok(Some(
            "[Echo Provider] Query received (no actual LLM call made)".to_string(),
        ))
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<Value, Error> {
        let mut payload = json!({
            "query": query,
        });

        if let Some(system) = system_instruction {
            payload["system_instruction"] = json!(system);
        }

        if !history.is_empty() {
            let history_json: Vec<Value> = history
                .iter()
                .map(|msg| {
                    json!({
                        "role": msg.role,
                        "content": msg.content
                    })
                })
                .collect();
            payload["history"] = json!(history_json);
        }

        Ok(payload)
    }

    fn stream_events(
        &self,
        request_json: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error> {
        // クエリをそのまま語単位で返し、ストリーミング表示の動作確認に使う
        let v: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::json(format!("Failed to parse request: {}", e)))?;
        let query = v["query"].as_str().unwrap_or("").to_string();
        let text = format!("[Echo Provider] You said: {}", query);

        for word in text.split_whitespace() {
            callback(LlmEvent::TextDelta(format!("{} ", word)))?;
            thread::sleep(Duration::from_millis(10));
        }

        callback(LlmEvent::Completed {
            finish: FinishReason::Stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_provider_name() {
        let provider = EchoProvider::new();
        assert_eq!(provider.name(), "echo");
    }

    #[test]
    fn test_echo_provider_make_request_payload() {
        let provider = EchoProvider::new();
        let payload = provider.make_request_payload("Hello", None, &[]).unwrap();
        assert_eq!(payload["query"], "Hello");
    }

    #[test]
    fn test_echo_provider_make_request_payload_with_system() {
        let provider = EchoProvider::new();
        let payload = provider
            .make_request_payload("Hello", Some("You are helpful"), &[])
            .unwrap();
        assert_eq!(payload["query"], "Hello");
        assert_eq!(payload["system_instruction"], "You are helpful");
    }

    #[test]
    fn test_echo_provider_make_request_payload_with_history() {
        let provider = EchoProvider::new();
        let history = vec![Message::user("Hi"), Message::assistant("Hello!")];
        let payload = provider
            .make_request_payload("How are you?", None, &history)
            .unwrap();
        assert_eq!(payload["query"], "How are you?");
        assert!(payload["history"].is_array());
        assert_eq!(payload["history"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_echo_provider_parse_response_text() {
        let provider = EchoProvider::new();
        let result = provider.parse_response_text("{}").unwrap();
        assert!(result.is_some());
        assert!(result.unwrap().contains("Echo Provider"));
    }

    #[test]
    fn test_echo_provider_stream_events() {
        let provider = EchoProvider::new();
        let request = serde_json::to_string(&json!({"query": "ping"})).unwrap();
        let mut events = Vec::new();
        provider
            .stream_events(&request, &mut |ev| {
                events.push(ev);
                Ok(())
            })
            .unwrap();
        assert!(matches!(
            events.last(),
            Some(LlmEvent::Completed {
                finish: FinishReason::Stop
            })
        ));
        let text: String = events
            .iter()
            .filter_map(|ev| match ev {
                LlmEvent::TextDelta(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert!(text.contains("ping"));
    }
}

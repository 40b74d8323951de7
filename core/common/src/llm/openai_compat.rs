//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイント（OpenAI / Ollama / vLLM など）を指定可能。
//! ストリーミング（SSE）を LlmEvent に正規化する。

use crate::error::Error;
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::provider::{LlmProvider, Message};
use serde_json::{json, Value};
use std::env;
use std::io::{BufRead, BufReader};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f64 = 0.0;
const DEFAULT_MAX_TOKENS: u64 = 8192;

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    model: String,
    base_url: String,
    api_key_env: Option<String>,
    temperature: f64,
    max_tokens: u64,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `model` - モデル名（None のとき DEFAULT_MODEL）
    /// * `base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `api_key_env` - API キーを読む環境変数名（None のとき Authorization を付けない）
    /// * `temperature` - 温度（None のとき 0.0）
    /// * `max_tokens` - 最大出力トークン数（None のとき 8192）
    pub fn new(
        model: Option<String>,
        base_url: Option<String>,
        api_key_env: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let temperature = temperature.map(f64::from).unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = max_tokens.map(u64::from).unwrap_or(DEFAULT_MAX_TOKENS);
        Ok(Self {
            model,
            base_url,
            api_key_env,
            temperature,
            max_tokens,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|name| env::var(name).ok().map(|key| format!("Bearer {}", key)))
    }

    fn extract_error_message(status: reqwest::StatusCode, response_text: &str) -> String {
        if let Ok(v) = serde_json::from_str::<Value>(response_text) {
            v["error"]["message"]
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text))
        } else {
            format!("HTTP {}: {}", status, response_text)
        }
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = reqwest::blocking::Client::new()
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(request_json.to_string());

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error_msg = Self::extract_error_message(status, &response_text);
            return Err(Error::http(format!("Chat completions error: {}", error_msg)));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("API error: {}", msg)));
        }

        let text = v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string());
        Ok(text)
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<Value, Error> {
        let mut messages: Vec<Value> = Vec::new();

        // システム指示は先頭の system メッセージとして毎回送る
        if let Some(s) = system_instruction {
            messages.push(json!({ "role": "system", "content": s }));
        }

        for msg in history {
            messages.push(json!({ "role": msg.role, "content": msg.content }));
        }

        messages.push(json!({ "role": "user", "content": query }));

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false
        });

        Ok(payload)
    }

    fn stream_events(
        &self,
        request_json: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut payload: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::json(format!("Failed to parse request JSON: {}", e)))?;
        payload["stream"] = json!(true);
        let body = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let mut builder = reqwest::blocking::Client::new()
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(body);

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response
                .text()
                .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
            let error_msg = Self::extract_error_message(status, &response_text);
            return Err(Error::http(format!("Chat completions error: {}", error_msg)));
        }

        let reader = BufReader::new(response);
        for line_result in reader.lines() {
            let line = line_result
                .map_err(|e| Error::http(format!("Failed to read stream line: {}", e)))?;
            if !line.starts_with("data: ") {
                continue;
            }
            let data = line["data: ".len()..].trim();
            if data == "[DONE]" {
                break;
            }

            let v: Value = match serde_json::from_str(data) {
                Ok(x) => x,
                Err(_) => continue,
            };

            let delta = match v["choices"].get(0).and_then(|c| c.get("delta")) {
                Some(d) => d,
                None => continue,
            };

            // content: 文字列のほか、OpenAI 互換の content parts 配列にも対応
            if let Some(s) = delta["content"].as_str() {
                if !s.is_empty() {
                    callback(LlmEvent::TextDelta(s.to_string()))?;
                }
            } else if let Some(parts) = delta["content"].as_array() {
                for part in parts {
                    if let Some(text) = part["text"].as_str() {
                        if !text.is_empty() {
                            callback(LlmEvent::TextDelta(text.to_string()))?;
                        }
                    }
                }
            }

            // reasoning_content: DeepSeek R1 系の推論モデルが使用するフィールド。
            // content が空のとき、reasoning_content にテキストが入る場合がある。
            if let Some(s) = delta["reasoning_content"].as_str() {
                if !s.is_empty() {
                    callback(LlmEvent::ReasoningDelta(s.to_string()))?;
                }
            }
        }

        // 空ストリーム（content なし）はエラーにせず正常終了する。
        callback(LlmEvent::Completed {
            finish: FinishReason::Stop,
        })?;
        Ok(())
    }
}

//! Gemini プロバイダの実装

use crate::error::Error;
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::provider::{LlmProvider, Message};
use serde_json::{json, Value};
use std::env;
use std::io::{BufRead, BufReader};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.0;
const DEFAULT_MAX_TOKENS: u64 = 8192;

/// Gemini プロバイダ
pub struct GeminiProvider {
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: u64,
}

impl GeminiProvider {
    /// 新しいGeminiプロバイダを作成
    ///
    /// # Arguments
    /// * `model` - モデル名（None のとき DEFAULT_MODEL）
    /// * `temperature` - 温度（None のとき 0.0）
    /// * `max_tokens` - 最大出力トークン数（None のとき 8192）
    ///
    /// # Returns
    /// * `Ok(Self)` - プロバイダ
    /// * `Err(Error)` - エラーメッセージと終了コード
    pub fn new(
        model: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| Error::env("GEMINI_API_KEY environment variable is not set"))?;
        let temperature = temperature.map(f64::from).unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = max_tokens.map(u64::from).unwrap_or(DEFAULT_MAX_TOKENS);

        Ok(Self {
            model,
            api_key,
            temperature,
            max_tokens,
        })
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

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(request_json.to_string())
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error_msg = Self::extract_error_message(status, &response_text);
            return Err(Error::http(format!("Gemini API error: {}", error_msg)));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        // エラーチェック
        if let Some(error) = v.get("error") {
            let error_msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("Gemini API error: {}", error_msg)));
        }

        // テキストを抽出
        let text = v["candidates"][0]["content"]["parts"]
            .as_array()
            .and_then(|parts| parts.iter().find_map(|part| part["text"].as_str()))
            .map(|s| s.to_string());

        Ok(text)
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        history: &[Message],
    ) -> Result<Value, Error> {
        let mut payload = json!({});

        // システム指示はユーザーメッセージに混ぜず、専用フィールドで毎回送る
        if let Some(system) = system_instruction {
            payload["systemInstruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        payload["generationConfig"] = json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_tokens
        });

        // 会話履歴とクエリをcontentsに追加
        // Gemini APIは "assistant" ではなく "model" というroleを使用する
        let mut contents = Vec::new();
        for msg in history {
            let role = if msg.role == "assistant" {
                "model"
            } else {
                &msg.role
            };
            contents.push(json!({
                "role": role,
                "parts": [{"text": msg.content}]
            }));
        }

        contents.push(json!({
            "role": "user",
            "parts": [{"text": query}]
        }));

        payload["contents"] = json!(contents);

        Ok(payload)
    }

    /// ストリームを LlmEvent に正規化
    fn stream_events(
        &self,
        request_json: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:streamGenerateContent?key={}",
            self.model, self.api_key
        );
        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .body(request_json.to_string())
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            let response_text = response
                .text()
                .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
            let error_msg = Self::extract_error_message(status, &response_text);
            return Err(Error::http(format!("Gemini API error: {}", error_msg)));
        }

        // Gemini APIはJSON配列形式でストリーミングレスポンスを返す
        // 形式: [ {JSON1} , {JSON2} , ... ]
        // ブレースカウントで完全なJSONオブジェクトを検出
        let reader = BufReader::new(response);
        let mut json_buffer = String::new();
        let mut brace_count = 0;
        let mut in_object = false;
        for line_result in reader.lines() {
            let line = line_result
                .map_err(|e| Error::http(format!("Failed to read stream line: {}", e)))?;
            for c in line.chars() {
                match c {
                    '{' => {
                        if !in_object {
                            in_object = true;
                            json_buffer.clear();
                        }
                        brace_count += 1;
                        json_buffer.push(c);
                    }
                    '}' => {
                        if in_object {
                            brace_count -= 1;
                            json_buffer.push(c);
                            if brace_count == 0 {
                                Self::handle_json_chunk_events(&json_buffer, callback)?;
                                json_buffer.clear();
                                in_object = false;
                            }
                        }
                    }
                    _ => {
                        if in_object {
                            json_buffer.push(c);
                        }
                    }
                }
            }
            if in_object {
                json_buffer.push('\n');
            }
        }

        callback(LlmEvent::Completed {
            finish: FinishReason::Stop,
        })?;
        Ok(())
    }
}

impl GeminiProvider {
    /// JSONチャンクを LlmEvent に変換
    fn handle_json_chunk_events(
        json_str: &str,
        callback: &mut dyn FnMut(LlmEvent) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let v: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(_) => return Ok(()), // パース失敗は無視（不完全なJSONの可能性）
        };
        if let Some(error) = v.get("error") {
            let error_msg = error["message"].as_str().unwrap_or("Unknown error");
            return callback(LlmEvent::Failed {
                message: format!("Gemini API error: {}", error_msg),
            });
        }
        if let Some(parts) = v["candidates"][0]["content"]["parts"].as_array() {
            for part in parts {
                if let Some(text) = part["text"].as_str() {
                    if !text.is_empty() {
                        callback(LlmEvent::TextDelta(text.to_string()))?;
                    }
                }
            }
        }
        Ok(())
    }
}

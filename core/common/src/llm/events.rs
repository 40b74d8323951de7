//! LLMストリームの共通イベント型
//!
//! プロバイダごとの差異をadapter層で吸収し、共通のイベント列に正規化する。

use serde::{Deserialize, Serialize};

/// ストリーム終了理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// 通常終了
    Stop,
    /// 長さ制限
    Length,
    /// その他（プロバイダ固有）
    Other(String),
}

/// LLMストリームから来る正規化済みイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LlmEvent {
    /// アシスタントテキストの増分
    TextDelta(String),
    /// 思考過程（推論）の増分（表示はグレーにする想定）
    ReasoningDelta(String),
    /// ストリーム完了
    Completed { finish: FinishReason },
    /// ストリーム失敗
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_stop() {
        let r = FinishReason::Stop;
        assert_eq!(r, FinishReason::Stop);
    }

    #[test]
    fn test_finish_reason_other() {
        let r = FinishReason::Other("content_filter".to_string());
        assert!(matches!(r, FinishReason::Other(s) if s == "content_filter"));
    }

    #[test]
    fn test_llm_event_text_delta() {
        let ev = LlmEvent::TextDelta("hello".to_string());
        assert!(matches!(ev, LlmEvent::TextDelta(s) if s == "hello"));
    }

    #[test]
    fn test_llm_event_reasoning_delta() {
        let ev = LlmEvent::ReasoningDelta("thinking...".to_string());
        assert!(matches!(ev, LlmEvent::ReasoningDelta(s) if s == "thinking..."));
    }

    #[test]
    fn test_llm_event_completed() {
        let ev = LlmEvent::Completed {
            finish: FinishReason::Stop,
        };
        assert!(matches!(ev, LlmEvent::Completed { finish: FinishReason::Stop }));
    }

    #[test]
    fn test_llm_event_failed() {
        let ev = LlmEvent::Failed {
            message: "connection reset".to_string(),
        };
        assert!(matches!(ev, LlmEvent::Failed { message } if message == "connection reset"));
    }
}

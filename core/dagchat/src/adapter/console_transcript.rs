//! コンソールへの会話描画（TranscriptSink 実装）
//!
//! アシスタントの差分は stdout へ逐次出力し、都度 flush する。

use crate::ports::outbound::TranscriptSink;
use common::llm::Message;
use std::io::{self, Write};

/// 標準出力に会話を描画する実装
pub struct ConsoleTranscript;

impl ConsoleTranscript {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleTranscript {
    fn default() -> Self {
        Self::new()
    }
}

fn prefix_for(role: &str) -> &'static str {
    if role == "assistant" {
        "ai> "
    } else {
        "you> "
    }
}

impl TranscriptSink for ConsoleTranscript {
    fn user_echo(&self, text: &str) {
        println!("you> {}", text);
    }

    fn assistant_delta(&self, delta: &str) {
        print!("{}", delta);
        let _ = io::stdout().flush();
    }

    fn assistant_end(&self) {
        println!();
    }

    fn render_history(&self, messages: &[Message]) {
        for m in messages {
            println!("{}{}", prefix_for(&m.role), m.content);
        }
    }
}

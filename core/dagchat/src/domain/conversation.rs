//! セッション内会話状態（追記専用のメッセージ列）
//!
//! ロールは user | assistant のみ。セッション終了とともに破棄され、永続化しない。

use common::llm::Message;

/// 1 セッション分の会話履歴
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// ユーザー発話を末尾に追加する
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// アシスタント応答を末尾に追加する
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// 発話順のメッセージ列
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

//! 会話表示の Outbound ポート
//!
//! ストリーミングされるアシスタント応答と履歴の描画を抽象化する。

use common::llm::Message;

/// 会話をコンソール等へ描画する能力
pub trait TranscriptSink: Send + Sync {
    /// ユーザー発話を表示する（一問一答時のエコーと履歴描画に使用）
    fn user_echo(&self, text: &str);
    /// アシスタント応答の差分を（改行せずに）表示する
    fn assistant_delta(&self, delta: &str);
    /// アシスタント応答の終端（改行で区切る）
    fn assistant_end(&self);
    /// これまでの会話全体を描画する（/history）
    fn render_history(&self, messages: &[Message]);
}

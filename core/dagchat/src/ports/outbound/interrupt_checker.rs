//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! 対話ループのターン境界で参照し、割り込み済みならセッションを正常終了する。

/// 割り込みが要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}

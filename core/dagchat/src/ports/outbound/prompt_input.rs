//! 対話入力の Outbound ポート
//!
//! REPL の 1 行入力を抽象化する。実装は標準入力や、非対話用の即 EOF スタブなど。

use common::error::Error;

/// プロンプトを表示して 1 行読む能力
///
/// Ok(None) は EOF（入力終端）を表し、usecase はセッションを正常終了する。
pub trait PromptInput: Send + Sync {
    fn read_line(&self) -> Result<Option<String>, Error>;
}

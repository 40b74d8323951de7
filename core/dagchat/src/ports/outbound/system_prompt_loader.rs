//! システムプロンプト構築の Outbound ポート
//!
//! DAG 定義ファイルの読み込みとプロンプト組み立てを抽象化する。

use crate::domain::SystemPrompt;
use common::error::Error;
use std::path::Path;

/// DAG 定義ファイルから SystemPrompt を構築する能力
///
/// ファイルが読めない場合は Io エラー（メッセージにパスを含める）。
pub trait SystemPromptLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<SystemPrompt, Error>;
}

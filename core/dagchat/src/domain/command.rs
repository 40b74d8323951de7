//! dagchat コマンドの enum（Command Pattern）
//!
//! 一問一答（Ask）と対話ループ（Chat）の分岐を enum で明示する。

use crate::domain::Question;
use common::domain::{ModelName, ProviderName};
use std::path::PathBuf;

/// dagchat の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// ヘルプ表示
    Help,
    /// プロファイル一覧表示
    ListProfiles,
    /// 一問一答（位置引数でメッセージが与えられた場合）
    Ask {
        profile: Option<ProviderName>,
        model: Option<ModelName>,
        system: Option<String>,
        file: PathBuf,
        env_file: PathBuf,
        question: Question,
    },
    /// 対話ループ（位置引数なしの場合）
    Chat {
        profile: Option<ProviderName>,
        model: Option<ModelName>,
        system: Option<String>,
        file: PathBuf,
        env_file: PathBuf,
    },
}

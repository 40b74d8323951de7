//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリと profiles.json の場所を環境変数から解決する。
//! usecase はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. DAGCHAT_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/dagchat（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/dagchat
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// プロバイダプロファイル設定ファイルのパス（resolve_home_dir() 直下の profiles.json）
    fn resolve_profiles_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("profiles.json"))
    }
}

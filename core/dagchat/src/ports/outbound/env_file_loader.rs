//! 認証情報ファイル読み込みの Outbound ポート
//!
//! 起動時に env ファイル（credentials.env など）をプロセス環境へ取り込む。

use common::error::Error;
use std::path::Path;

/// env ファイルが存在すればプロセス環境に読み込む能力
///
/// 戻り値は読み込んだかどうか。ファイルが無いのはエラーではない。
pub trait EnvFileLoader: Send + Sync {
    fn load_if_present(&self, path: &Path) -> Result<bool, Error>;
}

//! プロファイル一覧取得の Outbound ポート

use common::error::Error;

/// 現在有効なプロファイル一覧を取得する能力
///
/// 戻り値はソート済みの名前リストとデフォルトプロファイル名。
pub trait ProfileLister: Send + Sync {
    fn list_profiles(&self) -> Result<(Vec<String>, Option<String>), Error>;
}

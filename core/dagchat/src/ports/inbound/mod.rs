//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::cli::Config;
use common::error::Error;

/// 解析済み Config を受けてユースケースを実行する Inbound ポート
///
/// main/cli はこの trait を実装した型（Runner）の run を呼び出す。
pub trait UseCaseRunner {
    fn run(&self, config: Config) -> Result<i32, Error>;
}

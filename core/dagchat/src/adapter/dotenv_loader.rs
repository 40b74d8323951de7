//! env ファイル読み込みアダプタ（dotenv を使用）
//!
//! 認証情報ファイル（credentials.env など）が存在する場合のみプロセス環境へ取り込む。

use crate::ports::outbound::EnvFileLoader;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::Path;
use std::sync::Arc;

/// dotenv で env ファイルを読み込む実装
pub struct DotenvLoader {
    fs: Arc<dyn FileSystem>,
}

impl DotenvLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl EnvFileLoader for DotenvLoader {
    fn load_if_present(&self, path: &Path) -> Result<bool, Error> {
        if !self.fs.exists(path) {
            return Ok(false);
        }
        dotenv::from_path(path).map_err(|e| Error::env(format!("{}: {}", path.display(), e)))?;
        Ok(true)
    }
}

//! DAG 定義ファイルから SystemPrompt を構築するアダプタ

use crate::domain::SystemPrompt;
use crate::ports::outbound::SystemPromptLoader;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::Path;
use std::sync::Arc;

/// FileSystem ポート経由でファイルを読み、プロンプトを組み立てる実装
pub struct FilePromptLoader {
    fs: Arc<dyn FileSystem>,
}

impl FilePromptLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl SystemPromptLoader for FilePromptLoader {
    fn load(&self, path: &Path) -> Result<SystemPrompt, Error> {
        let contents = self.fs.read_to_string(path)?;
        Ok(SystemPrompt::from_dag_file_contents(&contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;
    use std::io::Write;

    #[test]
    fn test_load_builds_prompt_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SQL_query.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "STAGE 0 - Model Name : orders").unwrap();

        let loader = FilePromptLoader::new(Arc::new(StdFileSystem));
        let prompt = loader.load(&path).unwrap();
        assert!(prompt.as_str().contains("STAGE 0 - Model Name : orders"));
        assert!(prompt.as_str().starts_with("You are an AI assistant"));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let loader = FilePromptLoader::new(Arc::new(StdFileSystem));
        let err = loader.load(Path::new("/nonexistent/SQL_query.txt")).unwrap_err();
        assert_eq!(err.exit_code(), 74);
        assert!(err.to_string().contains("SQL_query.txt"));
    }
}

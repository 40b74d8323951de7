//! 標準アダプタ実装
//!
//! ports::outbound の trait を std::fs / std::env で実装する。
//! usecase には Arc<dyn ...> として注入する。

pub mod file_json_log;
pub mod std_env_resolver;
pub mod std_fs;

pub use file_json_log::{FileJsonLog, NoopLog};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;

//! ユースケース層（一問一答・対話ループ・プロファイル一覧）

pub mod app;

pub use app::{ChatDeps, ChatUseCase, IoDeps, ModelDeps, ObsDeps, SourceDeps};

//! Outbound ポート: usecase が外界（端末・環境・プロファイル）を使うための trait

pub mod env_file_loader;
pub mod interrupt_checker;
pub mod profile_lister;
pub mod prompt_input;
pub mod system_prompt_loader;
pub mod transcript_sink;

pub use env_file_loader::EnvFileLoader;
pub use interrupt_checker::InterruptChecker;
pub use profile_lister::ProfileLister;
pub use prompt_input::PromptInput;
pub use system_prompt_loader::SystemPromptLoader;
pub use transcript_sink::TranscriptSink;

//! アダプタ実装（ports::outbound の trait を端末・環境で実装する）

pub mod console_transcript;
pub mod dotenv_loader;
pub mod file_prompt_loader;
pub mod profile_lister;
pub mod sigint_checker;
pub mod stdin_prompt_input;
pub mod verbose_log;

pub use console_transcript::ConsoleTranscript;
pub use dotenv_loader::DotenvLoader;
pub use file_prompt_loader::FilePromptLoader;
pub use profile_lister::StdProfileLister;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub use stdin_prompt_input::{NonInteractivePromptInput, StdinPromptInput};
pub use verbose_log::VerboseLog;

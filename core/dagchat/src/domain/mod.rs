//! dagchat 固有のドメイン型（型と不変条件）

pub mod command;
pub mod conversation;
pub mod question;
pub mod system_prompt;
pub use command::ChatCommand;
pub use conversation::Conversation;
pub use question::Question;
pub use system_prompt::SystemPrompt;

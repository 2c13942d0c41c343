//! Subcommand handlers (design §6.5: `chat`, `info`).

mod chat;
mod info;

pub use chat::run_chat;
pub use info::run_info;

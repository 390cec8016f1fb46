//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod comment_handlers;
mod poll_handlers;
mod vote_handlers;

pub use comment_handlers::*;
pub use poll_handlers::*;
pub use vote_handlers::*;

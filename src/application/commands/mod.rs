//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod comment_commands;
mod poll_commands;
mod vote_commands;

pub mod handlers;

pub use comment_commands::*;
pub use poll_commands::*;
pub use vote_commands::*;

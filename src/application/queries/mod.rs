//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod comment_queries;
mod poll_queries;
mod vote_queries;

pub mod handlers;

pub use comment_queries::*;
pub use poll_queries::*;
pub use vote_queries::*;

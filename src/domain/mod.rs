//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Poll Context: 投票活动与选项（候选人）管理、计票
//! - Ballot Context: 投票人身份（浏览器指纹 + IP）与去重策略
//! - Comment Context: 投票下的评论与表态

pub mod ballot;
pub mod comment;
pub mod poll;

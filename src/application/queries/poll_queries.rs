//! Poll Queries

use uuid::Uuid;

/// 获取投票详情查询
#[derive(Debug, Clone)]
pub struct GetPoll {
    pub poll_id: Uuid,
}

/// 列出投票查询
#[derive(Debug, Clone, Default)]
pub struct ListPolls {
    pub active_only: bool,
}

/// 获取计票结果查询
#[derive(Debug, Clone)]
pub struct GetPollResults {
    pub poll_id: Uuid,
}

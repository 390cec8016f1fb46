//! Poll Commands

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::poll::PollKind;

/// 新选项 / 候选人
#[derive(Debug, Clone)]
pub struct NewOption {
    pub label: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// 创建投票命令
#[derive(Debug, Clone)]
pub struct CreatePoll {
    pub title: String,
    pub description: Option<String>,
    pub kind: PollKind,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub options: Vec<NewOption>,
}

/// 修改投票命令
///
/// 未提供的字段保持不变；`clear_schedule` 为真时取消时间限制。
#[derive(Debug, Clone, Default)]
pub struct UpdatePoll {
    pub poll_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub clear_schedule: bool,
}

/// 启用 / 停用投票命令
#[derive(Debug, Clone)]
pub struct SetPollActive {
    pub poll_id: Uuid,
    pub active: bool,
}

/// 追加选项命令
#[derive(Debug, Clone)]
pub struct AddPollOption {
    pub poll_id: Uuid,
    pub option: NewOption,
}

/// 删除投票命令
#[derive(Debug, Clone)]
pub struct DeletePoll {
    pub poll_id: Uuid,
}

/// 重新计票命令
#[derive(Debug, Clone)]
pub struct RecountPoll {
    pub poll_id: Uuid,
}

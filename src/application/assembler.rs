//! 聚合装配与视图
//!
//! 在持久化记录与 Poll 聚合之间转换，并定义命令/查询共用的响应视图

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CommentRecord, PollOptionRecord, PollRecord, PollRepositoryPort, RepositoryError,
};
use crate::domain::poll::{
    OptionId, OptionLabel, Poll, PollError, PollId, PollKind, PollOption, PollPhase, Schedule, Tally, Title,
};

/// 从仓储加载 Poll 聚合
pub async fn load_poll(
    repo: &dyn PollRepositoryPort,
    poll_id: Uuid,
) -> Result<Poll, ApplicationError> {
    let record = repo
        .find_by_id(poll_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Poll", poll_id))?;
    let options = repo.find_options(poll_id).await?;
    Ok(restore_poll(record, options)?)
}

/// 由记录恢复聚合
pub fn restore_poll(
    record: PollRecord,
    options: Vec<PollOptionRecord>,
) -> Result<Poll, RepositoryError> {
    let corrupt = |e: PollError| RepositoryError::SerializationError(e.to_string());

    let options = options
        .into_iter()
        .map(|o| -> Result<PollOption, RepositoryError> {
            Ok(PollOption::restore(
                OptionId::from_uuid(o.id),
                OptionLabel::new(o.label).map_err(corrupt)?,
                o.description,
                o.image_url,
                o.position,
                o.vote_count,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Poll::restore(
        PollId::from_uuid(record.id),
        Title::new(record.title).map_err(corrupt)?,
        record.description,
        record.kind,
        Schedule::new(record.starts_at, record.ends_at).map_err(corrupt)?,
        record.active,
        options,
        record.created_at,
        record.updated_at,
    ))
}

/// 聚合转为投票记录
pub fn poll_record(poll: &Poll) -> PollRecord {
    PollRecord {
        id: *poll.id().as_uuid(),
        title: poll.title().to_string(),
        description: poll.description().map(str::to_string),
        kind: poll.kind(),
        starts_at: poll.schedule().starts_at(),
        ends_at: poll.schedule().ends_at(),
        active: poll.is_active(),
        created_at: poll.created_at(),
        updated_at: poll.updated_at(),
    }
}

/// 选项转为记录
pub fn option_record(poll_id: PollId, option: &PollOption) -> PollOptionRecord {
    PollOptionRecord {
        id: *option.id().as_uuid(),
        poll_id: *poll_id.as_uuid(),
        label: option.label().to_string(),
        description: option.description().map(str::to_string),
        image_url: option.image_url().map(str::to_string),
        position: option.position(),
        vote_count: option.vote_count(),
    }
}

// ============================================================================
// Views
// ============================================================================

/// 选项视图
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub position: usize,
    pub vote_count: u64,
}

impl From<&PollOption> for OptionView {
    fn from(option: &PollOption) -> Self {
        Self {
            id: *option.id().as_uuid(),
            label: option.label().to_string(),
            description: option.description().map(str::to_string),
            image_url: option.image_url().map(str::to_string),
            position: option.position(),
            vote_count: option.vote_count(),
        }
    }
}

/// 投票视图
#[derive(Debug, Clone, Serialize)]
pub struct PollView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: PollKind,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub phase: PollPhase,
    pub options: Vec<OptionView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PollView {
    pub fn at(poll: &Poll, now: DateTime<Utc>) -> Self {
        Self {
            id: *poll.id().as_uuid(),
            title: poll.title().to_string(),
            description: poll.description().map(str::to_string),
            kind: poll.kind(),
            starts_at: poll.schedule().starts_at(),
            ends_at: poll.schedule().ends_at(),
            active: poll.is_active(),
            phase: poll.phase_at(now),
            options: poll.options().iter().map(OptionView::from).collect(),
            created_at: poll.created_at(),
            updated_at: poll.updated_at(),
        }
    }
}

/// 单个选项的计票视图
#[derive(Debug, Clone, Serialize)]
pub struct ResultEntryView {
    pub option_id: Uuid,
    pub label: String,
    pub votes: u64,
    pub percentage: f64,
}

/// 计票结果视图
#[derive(Debug, Clone, Serialize)]
pub struct PollResultsView {
    pub poll_id: Uuid,
    pub title: String,
    pub kind: PollKind,
    pub phase: PollPhase,
    pub total_votes: u64,
    pub leaders: Vec<Uuid>,
    pub results: Vec<ResultEntryView>,
}

impl PollResultsView {
    /// 由分组票数计算结果
    pub fn compute(poll: &Poll, counts: &HashMap<Uuid, u64>, now: DateTime<Utc>) -> Self {
        let counts: HashMap<OptionId, u64> = counts
            .iter()
            .map(|(id, n)| (OptionId::from_uuid(*id), *n))
            .collect();
        let tally = Tally::compute(poll.options(), &counts);

        Self {
            poll_id: *poll.id().as_uuid(),
            title: poll.title().to_string(),
            kind: poll.kind(),
            phase: poll.phase_at(now),
            total_votes: tally.total_votes,
            leaders: tally.leaders.iter().map(|id| *id.as_uuid()).collect(),
            results: tally
                .entries
                .into_iter()
                .map(|e| ResultEntryView {
                    option_id: *e.option_id.as_uuid(),
                    label: e.label,
                    votes: e.votes,
                    percentage: e.percentage,
                })
                .collect(),
        }
    }
}

/// 评论视图（不暴露指纹与 IP）
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub author: String,
    pub content: String,
    pub likes: u64,
    pub dislikes: u64,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentView {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            poll_id: record.poll_id,
            author: record.author,
            content: record.content,
            likes: record.likes,
            dislikes: record.dislikes,
            created_at: record.created_at,
        }
    }
}

//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ballot::{DedupPolicy, VoterIdentity};
use crate::domain::comment::ReactionKind;
use crate::domain::poll::PollKind;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Poll Repository
// ============================================================================

/// 投票实体（用于持久化）
#[derive(Debug, Clone)]
pub struct PollRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: PollKind,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 选项 / 候选人实体
#[derive(Debug, Clone)]
pub struct PollOptionRecord {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub position: usize,
    /// 累计票数（随投票递增，可通过 recount 校正）
    pub vote_count: u64,
}

/// Poll Repository Port
#[async_trait]
pub trait PollRepositoryPort: Send + Sync {
    /// 在同一事务中保存投票及其选项
    async fn create(
        &self,
        poll: &PollRecord,
        options: &[PollOptionRecord],
    ) -> Result<(), RepositoryError>;

    /// 更新标题、描述和时间窗口（不触碰启用状态）
    async fn update(&self, poll: &PollRecord) -> Result<(), RepositoryError>;

    /// 只更新启用状态
    async fn set_active(
        &self,
        id: Uuid,
        active: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 根据 ID 查找投票
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PollRecord>, RepositoryError>;

    /// 获取投票列表（按创建时间倒序）
    async fn find_all(&self, active_only: bool) -> Result<Vec<PollRecord>, RepositoryError>;

    /// 获取投票的所有选项（按 position 排序）
    async fn find_options(&self, poll_id: Uuid) -> Result<Vec<PollOptionRecord>, RepositoryError>;

    /// 追加选项
    async fn add_option(&self, option: &PollOptionRecord) -> Result<(), RepositoryError>;

    /// 删除投票及其选项、选票、评论
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Vote Repository
// ============================================================================

/// 选票实体
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub fingerprint: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// Vote Repository Port
#[async_trait]
pub trait VoteRepositoryPort: Send + Sync {
    /// 原子地记录一张选票并累加选项票数
    ///
    /// 按 `policy` 判定为重复时返回 `RepositoryError::Duplicate`，
    /// 选项不属于该投票时返回 `RepositoryError::NotFound`，均不留下任何写入。
    async fn record(&self, vote: &VoteRecord, policy: DedupPolicy)
        -> Result<(), RepositoryError>;

    /// 按 `policy` 查找投票人已投的选票
    async fn find_by_voter(
        &self,
        poll_id: Uuid,
        voter: &VoterIdentity,
        policy: DedupPolicy,
    ) -> Result<Option<VoteRecord>, RepositoryError>;

    /// 按选项分组统计票数
    async fn count_by_option(&self, poll_id: Uuid) -> Result<HashMap<Uuid, u64>, RepositoryError>;

    /// 用分组统计结果重写各选项累计票数，返回被校正的选项数
    async fn recount(&self, poll_id: Uuid) -> Result<usize, RepositoryError>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// 评论实体
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub author: String,
    pub content: String,
    pub fingerprint: String,
    pub ip_address: String,
    pub likes: u64,
    pub dislikes: u64,
    pub created_at: DateTime<Utc>,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    /// 保存评论
    async fn save(&self, comment: &CommentRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找评论
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError>;

    /// 获取投票下的评论（按时间倒序）
    async fn find_by_poll(&self, poll_id: Uuid) -> Result<Vec<CommentRecord>, RepositoryError>;

    /// 记录表态并累加计数，返回更新后的评论
    ///
    /// 同一指纹对同一评论只能表态一次，重复时返回 `RepositoryError::Duplicate`。
    async fn react(
        &self,
        comment_id: Uuid,
        fingerprint: &str,
        reaction: ReactionKind,
    ) -> Result<CommentRecord, RepositoryError>;

    /// 删除评论及其表态
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

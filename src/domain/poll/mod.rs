//! Poll Context - 投票限界上下文
//!
//! 职责:
//! - 投票聚合管理（标题、类型、时间窗口、启用状态）
//! - 选项 / 候选人实体
//! - 计票结果聚合

mod aggregate;
mod entities;
mod errors;
mod tally;
mod value_objects;

pub use aggregate::Poll;
pub use entities::{OptionLabel, PollOption};
pub use errors::PollError;
pub use tally::{Tally, TallyEntry};
pub use value_objects::{OptionId, PollId, PollKind, PollPhase, Schedule, Title};

/// 单个投票最少选项数
pub const MIN_OPTIONS: usize = 2;

/// 单个投票最多选项数
pub const MAX_OPTIONS: usize = 20;

/// 投票描述最大长度（字符）
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

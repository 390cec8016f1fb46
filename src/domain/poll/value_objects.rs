//! Poll Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PollError;

/// 投票唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollId(Uuid);

impl PollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PollId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 选项唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionId(Uuid);

impl OptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 投票标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, PollError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(PollError::InvalidTitle("标题不能为空".to_string()));
        }
        if title.chars().count() > 200 {
            return Err(PollError::InvalidTitle("标题长度不能超过200字符".to_string()));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 投票类型
///
/// `Election` 的选项即候选人，可附带简介与头像
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollKind {
    #[default]
    Poll,
    Election,
}

impl PollKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollKind::Poll => "poll",
            PollKind::Election => "election",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "poll" => Some(PollKind::Poll),
            "election" => Some(PollKind::Election),
            _ => None,
        }
    }
}

/// 投票所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    /// 未到开始时间
    Upcoming,
    /// 接受投票
    Open,
    /// 已过结束时间
    Closed,
    /// 被管理员停用
    Inactive,
}

impl PollPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollPhase::Upcoming => "upcoming",
            PollPhase::Open => "open",
            PollPhase::Closed => "closed",
            PollPhase::Inactive => "inactive",
        }
    }
}

/// 投票时间窗口 `[starts_at, ends_at)`
///
/// 两端均可缺省，缺省表示不限制。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn new(
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<Self, PollError> {
        if let (Some(start), Some(end)) = (starts_at, ends_at) {
            if start >= end {
                return Err(PollError::InvalidSchedule(
                    "开始时间必须早于结束时间".to_string(),
                ));
            }
        }
        Ok(Self { starts_at, ends_at })
    }

    /// 不限时间
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// 判断 `now` 是否落在窗口内
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), PollError> {
        if let Some(start) = self.starts_at {
            if now < start {
                return Err(PollError::NotStarted);
            }
        }
        if let Some(end) = self.ends_at {
            if now >= end {
                return Err(PollError::Ended);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_title_is_trimmed_and_validated() {
        assert_eq!(Title::new("  午饭吃什么 ").unwrap().as_str(), "午饭吃什么");
        assert!(Title::new("   ").is_err());
        assert!(Title::new("x".repeat(201)).is_err());
        assert!(Title::new("字".repeat(200)).is_ok());
    }

    #[test]
    fn test_schedule_rejects_inverted_window() {
        let now = Utc::now();
        assert!(Schedule::new(Some(now), Some(now)).is_err());
        assert!(Schedule::new(Some(now), Some(now - Duration::hours(1))).is_err());
        assert!(Schedule::new(Some(now), None).is_ok());
    }

    #[test]
    fn test_schedule_window_is_half_open() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        let schedule = Schedule::new(Some(start), Some(end)).unwrap();

        assert_eq!(
            schedule.check(start - Duration::seconds(1)),
            Err(PollError::NotStarted)
        );
        assert_eq!(schedule.check(start), Ok(()));
        assert_eq!(schedule.check(end), Err(PollError::Ended));
        assert_eq!(Schedule::unbounded().check(end), Ok(()));
    }

    #[test]
    fn test_poll_kind_round_trips_through_str() {
        assert_eq!(PollKind::from_str("election"), Some(PollKind::Election));
        assert_eq!(PollKind::Election.as_str(), "election");
        assert_eq!(PollKind::from_str("referendum"), None);
    }
}

//! Poll Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    OptionId, OptionLabel, PollError, PollId, PollKind, PollOption, PollPhase, Schedule, Title,
    MAX_DESCRIPTION_CHARS, MAX_OPTIONS, MIN_OPTIONS,
};

/// Poll 聚合根
///
/// 不变量:
/// - 创建时选项数量在 [MIN_OPTIONS, MAX_OPTIONS] 之间
/// - 同一投票内选项文本不重复（忽略大小写）
/// - 时间窗口开始早于结束
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    id: PollId,
    title: Title,
    description: Option<String>,
    kind: PollKind,
    schedule: Schedule,
    active: bool,
    options: Vec<PollOption>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Poll {
    /// 创建新投票
    pub fn new(
        title: Title,
        description: Option<String>,
        kind: PollKind,
        schedule: Schedule,
        options: Vec<PollOption>,
    ) -> Result<Self, PollError> {
        let description = validate_description(description)?;

        if options.len() < MIN_OPTIONS {
            return Err(PollError::TooFewOptions {
                min: MIN_OPTIONS,
                actual: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(PollError::TooManyOptions { max: MAX_OPTIONS });
        }

        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.label().normalized()) {
                return Err(PollError::DuplicateOption(option.label().to_string()));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: PollId::new(),
            title,
            description,
            kind,
            schedule,
            active: true,
            options,
            created_at: now,
            updated_at: now,
        })
    }

    /// 从持久化数据恢复（不做创建期校验）
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: PollId,
        title: Title,
        description: Option<String>,
        kind: PollKind,
        schedule: Schedule,
        active: bool,
        mut options: Vec<PollOption>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        options.sort_by_key(|o| o.position());
        Self {
            id,
            title,
            description,
            kind,
            schedule,
            active,
            options,
            created_at,
            updated_at,
        }
    }

    /// 当前时刻所处阶段
    pub fn phase_at(&self, now: DateTime<Utc>) -> PollPhase {
        if !self.active {
            return PollPhase::Inactive;
        }
        match self.schedule.check(now) {
            Ok(()) => PollPhase::Open,
            Err(PollError::NotStarted) => PollPhase::Upcoming,
            Err(_) => PollPhase::Closed,
        }
    }

    /// 检查在 `now` 是否可以对 `option_id` 投票
    pub fn ensure_accepts_vote(
        &self,
        option_id: OptionId,
        now: DateTime<Utc>,
    ) -> Result<&PollOption, PollError> {
        if !self.active {
            return Err(PollError::Inactive);
        }
        self.schedule.check(now)?;
        self.option(option_id)
            .ok_or(PollError::OptionNotFound(option_id))
    }

    /// 修改标题、描述和时间窗口
    pub fn revise(
        &mut self,
        title: Option<Title>,
        description: Option<String>,
        schedule: Option<Schedule>,
    ) -> Result<(), PollError> {
        if let Some(description) = description {
            self.description = validate_description(Some(description))?;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(schedule) = schedule {
            self.schedule = schedule;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 启用或停用
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = Utc::now();
    }

    /// 追加选项，返回新选项
    pub fn add_option(
        &mut self,
        label: OptionLabel,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Result<&PollOption, PollError> {
        if self.options.len() >= MAX_OPTIONS {
            return Err(PollError::TooManyOptions { max: MAX_OPTIONS });
        }
        let normalized = label.normalized();
        if self
            .options
            .iter()
            .any(|o| o.label().normalized() == normalized)
        {
            return Err(PollError::DuplicateOption(label.to_string()));
        }

        let position = self
            .options
            .iter()
            .map(|o| o.position() + 1)
            .max()
            .unwrap_or(0);
        self.options
            .push(PollOption::new(label, description, image_url, position));
        self.updated_at = Utc::now();

        let last = self.options.len() - 1;
        Ok(&self.options[last])
    }

    // Getters
    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> PollKind {
        self.kind
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn option(&self, id: OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id() == id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_description(description: Option<String>) -> Result<Option<String>, PollError> {
    match description.map(|d| d.trim().to_string()) {
        Some(d) if d.is_empty() => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_CHARS => Err(
            PollError::InvalidDescription(format!("描述长度不能超过{}字符", MAX_DESCRIPTION_CHARS)),
        ),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn options(labels: &[&str]) -> Vec<PollOption> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| PollOption::new(OptionLabel::new(*l).unwrap(), None, None, i))
            .collect()
    }

    fn poll(labels: &[&str]) -> Result<Poll, PollError> {
        Poll::new(
            Title::new("最喜欢的语言").unwrap(),
            None,
            PollKind::Poll,
            Schedule::unbounded(),
            options(labels),
        )
    }

    #[test]
    fn test_poll_requires_at_least_two_options() {
        assert_eq!(
            poll(&["Rust"]).unwrap_err(),
            PollError::TooFewOptions { min: 2, actual: 1 }
        );
        assert!(poll(&["Rust", "Go"]).is_ok());
    }

    #[test]
    fn test_poll_rejects_too_many_options() {
        let labels: Vec<String> = (0..=MAX_OPTIONS).map(|i| format!("选项{}", i)).collect();
        let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            poll(&refs).unwrap_err(),
            PollError::TooManyOptions { max: MAX_OPTIONS }
        );
    }

    #[test]
    fn test_poll_rejects_duplicate_labels_ignoring_case() {
        assert!(matches!(
            poll(&["Rust", "rust "]),
            Err(PollError::DuplicateOption(_))
        ));
    }

    #[test]
    fn test_inactive_poll_refuses_votes() {
        let mut poll = poll(&["Rust", "Go"]).unwrap();
        let option_id = poll.options()[0].id();
        poll.set_active(false);

        assert_eq!(
            poll.ensure_accepts_vote(option_id, Utc::now()).unwrap_err(),
            PollError::Inactive
        );
        assert_eq!(poll.phase_at(Utc::now()), PollPhase::Inactive);
    }

    #[test]
    fn test_vote_outside_window_is_refused() {
        let now = Utc::now();
        let schedule = Schedule::new(Some(now + Duration::hours(1)), None).unwrap();
        let poll = Poll::new(
            Title::new("明天的会议").unwrap(),
            None,
            PollKind::Poll,
            schedule,
            options(&["上午", "下午"]),
        )
        .unwrap();
        let option_id = poll.options()[0].id();

        assert_eq!(
            poll.ensure_accepts_vote(option_id, now).unwrap_err(),
            PollError::NotStarted
        );
        assert_eq!(poll.phase_at(now), PollPhase::Upcoming);
        assert_eq!(poll.phase_at(now + Duration::hours(2)), PollPhase::Open);
    }

    #[test]
    fn test_unknown_option_is_refused() {
        let poll = poll(&["Rust", "Go"]).unwrap();
        let stranger = OptionId::new();
        assert_eq!(
            poll.ensure_accepts_vote(stranger, Utc::now()).unwrap_err(),
            PollError::OptionNotFound(stranger)
        );
    }

    #[test]
    fn test_add_option_appends_after_last_position() {
        let mut poll = poll(&["Rust", "Go"]).unwrap();
        let added = poll
            .add_option(OptionLabel::new("Zig").unwrap(), None, None)
            .unwrap();
        assert_eq!(added.position(), 2);
        assert_eq!(poll.options().len(), 3);

        assert!(matches!(
            poll.add_option(OptionLabel::new("GO").unwrap(), None, None),
            Err(PollError::DuplicateOption(_))
        ));
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let mut poll = poll(&["Rust", "Go"]).unwrap();
        poll.revise(None, Some("   ".to_string()), None).unwrap();
        assert_eq!(poll.description(), None);

        let too_long = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert!(poll.revise(None, Some(too_long), None).is_err());
    }
}

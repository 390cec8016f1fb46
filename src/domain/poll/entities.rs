//! Poll Context - Entities

use serde::{Deserialize, Serialize};

use super::{OptionId, PollError};

/// 选项文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLabel(String);

impl OptionLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, PollError> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(PollError::InvalidOption("选项不能为空".to_string()));
        }
        if label.chars().count() > 100 {
            return Err(PollError::InvalidOption(
                "选项长度不能超过100字符".to_string(),
            ));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 用于判重的规范化形式
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 投票选项（选举类投票中即候选人）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    id: OptionId,
    label: OptionLabel,
    description: Option<String>,
    image_url: Option<String>,
    position: usize,
    vote_count: u64,
}

impl PollOption {
    pub fn new(
        label: OptionLabel,
        description: Option<String>,
        image_url: Option<String>,
        position: usize,
    ) -> Self {
        Self {
            id: OptionId::new(),
            label,
            description: description.filter(|d| !d.trim().is_empty()),
            image_url: image_url.filter(|u| !u.trim().is_empty()),
            position,
            vote_count: 0,
        }
    }

    /// 从持久化数据恢复
    pub fn restore(
        id: OptionId,
        label: OptionLabel,
        description: Option<String>,
        image_url: Option<String>,
        position: usize,
        vote_count: u64,
    ) -> Self {
        Self {
            id,
            label,
            description,
            image_url,
            position,
            vote_count,
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn label(&self) -> &OptionLabel {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn vote_count(&self) -> u64 {
        self.vote_count
    }
}

//! Ballot Context - 浏览器指纹

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::BallotError;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 128;

/// 浏览器指纹
///
/// 客户端计算的不透明哈希，仅允许 `[A-Za-z0-9_-]`，长度 8..=128。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Result<Self, BallotError> {
        let value = value.into();
        let len = value.len();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(BallotError::InvalidFingerprint(format!(
                "长度必须在 {}..={} 之间",
                MIN_LEN, MAX_LEN
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(BallotError::InvalidFingerprint(
                "只能包含字母、数字、'-' 和 '_'".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 由浏览器特征生成指纹
    ///
    /// 特征按 key 排序后序列化为 `key=value\n`，取 md5 十六进制小写。
    pub fn from_components(components: &BTreeMap<String, String>) -> Result<Self, BallotError> {
        if components.is_empty() {
            return Err(BallotError::EmptyComponents);
        }
        let mut canonical = String::new();
        for (key, value) in components {
            canonical.push_str(key);
            canonical.push('=');
            canonical.push_str(value);
            canonical.push('\n');
        }
        let digest = md5::compute(canonical.as_bytes());
        Ok(Self(format!("{:x}", digest)))
    }

    /// 解析请求中的指纹：显式指纹优先，其次由特征生成
    pub fn resolve(
        explicit: Option<&str>,
        components: Option<&BTreeMap<String, String>>,
    ) -> Result<Self, BallotError> {
        match (explicit, components) {
            (Some(value), _) => Self::new(value),
            (None, Some(components)) => Self::from_components(components),
            (None, None) => Err(BallotError::MissingFingerprint),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

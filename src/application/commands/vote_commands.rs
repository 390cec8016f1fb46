//! Vote Commands

use std::collections::BTreeMap;
use uuid::Uuid;

/// 投票命令
///
/// `fingerprint` 与 `components` 至少提供其一，显式指纹优先。
#[derive(Debug, Clone)]
pub struct CastVote {
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
    pub ip_address: String,
}

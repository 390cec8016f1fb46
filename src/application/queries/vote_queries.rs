//! Vote Queries

use std::collections::BTreeMap;
use uuid::Uuid;

/// 查询投票人是否已投票
#[derive(Debug, Clone)]
pub struct GetVoteStatus {
    pub poll_id: Uuid,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
    pub ip_address: String,
}

//! Comment Commands

use std::collections::BTreeMap;
use uuid::Uuid;

/// 发表评论命令
#[derive(Debug, Clone)]
pub struct PostComment {
    pub poll_id: Uuid,
    pub author: Option<String>,
    pub content: String,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
    pub ip_address: String,
}

/// 评论表态命令
#[derive(Debug, Clone)]
pub struct ReactToComment {
    pub comment_id: Uuid,
    pub reaction: String,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
}

/// 删除评论命令
#[derive(Debug, Clone)]
pub struct DeleteComment {
    pub comment_id: Uuid,
}

//! Ballot Context - 投票人身份与去重策略

use serde::{Deserialize, Serialize};

use super::Fingerprint;

/// 无法确定客户端地址时使用的占位值
pub const UNKNOWN_IP: &str = "unknown";

/// 投票人身份 = 指纹 + IP
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterIdentity {
    fingerprint: Fingerprint,
    ip_address: String,
}

impl VoterIdentity {
    pub fn new(fingerprint: Fingerprint, ip_address: impl Into<String>) -> Self {
        let ip_address = ip_address.into();
        let ip_address = if ip_address.trim().is_empty() {
            UNKNOWN_IP.to_string()
        } else {
            ip_address.trim().to_string()
        };
        Self {
            fingerprint,
            ip_address,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }
}

/// 重复投票判定策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// 指纹与 IP 同时相同才视为同一投票人
    #[default]
    FingerprintAndIp,
    /// 指纹相同即视为同一投票人
    FingerprintOnly,
    /// 指纹或 IP 任一相同即视为同一投票人
    FingerprintOrIp,
}

impl DedupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupPolicy::FingerprintAndIp => "fingerprint_and_ip",
            DedupPolicy::FingerprintOnly => "fingerprint_only",
            DedupPolicy::FingerprintOrIp => "fingerprint_or_ip",
        }
    }

    /// 判断已有投票人 `existing` 与 `candidate` 是否视为同一人
    pub fn matches(&self, existing: &VoterIdentity, candidate: &VoterIdentity) -> bool {
        let same_fp = existing.fingerprint == candidate.fingerprint;
        let same_ip = existing.ip_address == candidate.ip_address;
        match self {
            DedupPolicy::FingerprintAndIp => same_fp && same_ip,
            DedupPolicy::FingerprintOnly => same_fp,
            DedupPolicy::FingerprintOrIp => same_fp || same_ip,
        }
    }
}

impl std::fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

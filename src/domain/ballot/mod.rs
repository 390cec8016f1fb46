//! Ballot Context - 投票人身份上下文
//!
//! 投票人由浏览器指纹 + 客户端 IP 识别，
//! 去重策略决定何种身份重合视为"已投过票"。

mod errors;
mod fingerprint;
mod identity;

pub use errors::BallotError;
pub use fingerprint::Fingerprint;
pub use identity::{DedupPolicy, VoterIdentity, UNKNOWN_IP};

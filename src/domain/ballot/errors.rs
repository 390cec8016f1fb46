//! Ballot Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("缺少浏览器指纹")]
    MissingFingerprint,

    #[error("无效的浏览器指纹: {0}")]
    InvalidFingerprint(String),

    #[error("指纹特征为空")]
    EmptyComponents,
}

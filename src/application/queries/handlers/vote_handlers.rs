//! Vote Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{PollRepositoryPort, VoteRepositoryPort};
use crate::application::queries::GetVoteStatus;
use crate::domain::ballot::{DedupPolicy, Fingerprint, VoterIdentity};

/// 投票状态响应
#[derive(Debug, Clone, Serialize)]
pub struct VoteStatusResponse {
    pub poll_id: Uuid,
    pub has_voted: bool,
    pub option_id: Option<Uuid>,
}

/// GetVoteStatus Handler
pub struct GetVoteStatusHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
    policy: DedupPolicy,
}

impl GetVoteStatusHandler {
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
        policy: DedupPolicy,
    ) -> Self {
        Self {
            poll_repo,
            vote_repo,
            policy,
        }
    }

    pub async fn handle(&self, query: GetVoteStatus) -> Result<VoteStatusResponse, ApplicationError> {
        self.poll_repo
            .find_by_id(query.poll_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Poll", query.poll_id))?;

        let fingerprint =
            Fingerprint::resolve(query.fingerprint.as_deref(), query.components.as_ref())?;
        let voter = VoterIdentity::new(fingerprint, query.ip_address);

        let vote = self
            .vote_repo
            .find_by_voter(query.poll_id, &voter, self.policy)
            .await?;

        Ok(VoteStatusResponse {
            poll_id: query.poll_id,
            has_voted: vote.is_some(),
            option_id: vote.map(|v| v.option_id),
        })
    }
}

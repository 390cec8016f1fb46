//! Vote Command Handlers
//!
//! 投票去重 + 计数：校验投票状态与选项后，由仓储在单个事务内
//! 完成插入、重复判定与选项票数累加。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::assembler::{load_poll, PollResultsView};
use crate::application::commands::CastVote;
use crate::application::error::ApplicationError;
use crate::application::ports::{PollRepositoryPort, RepositoryError, VoteRecord, VoteRepositoryPort};
use crate::domain::ballot::{DedupPolicy, Fingerprint, VoterIdentity};
use crate::domain::poll::OptionId;

/// 投票回执
#[derive(Debug, Clone, Serialize)]
pub struct VoteReceipt {
    pub vote_id: Uuid,
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// 投票后的最新结果
    pub results: PollResultsView,
}

/// CastVote Handler
pub struct CastVoteHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
    policy: DedupPolicy,
}

impl CastVoteHandler {
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

    pub async fn handle(&self, command: CastVote) -> Result<VoteReceipt, ApplicationError> {
        let now = Utc::now();
        let poll = load_poll(self.poll_repo.as_ref(), command.poll_id).await?;
        poll.ensure_accepts_vote(OptionId::from_uuid(command.option_id), now)?;

        let fingerprint =
            Fingerprint::resolve(command.fingerprint.as_deref(), command.components.as_ref())?;
        let voter = VoterIdentity::new(fingerprint, command.ip_address);

        let vote = VoteRecord {
            id: Uuid::new_v4(),
            poll_id: command.poll_id,
            option_id: command.option_id,
            fingerprint: voter.fingerprint().to_string(),
            ip_address: voter.ip_address().to_string(),
            created_at: now,
        };

        match self.vote_repo.record(&vote, self.policy).await {
            Ok(()) => {}
            Err(RepositoryError::Duplicate(_)) => {
                tracing::info!(
                    poll_id = %vote.poll_id,
                    ip = %vote.ip_address,
                    policy = %self.policy,
                    "Duplicate vote rejected"
                );
                return Err(ApplicationError::conflict("You have already voted on this poll"));
            }
            Err(RepositoryError::NotFound(_)) => {
                return Err(ApplicationError::not_found("Option", command.option_id));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            vote_id = %vote.id,
            poll_id = %vote.poll_id,
            option_id = %vote.option_id,
            "Vote recorded"
        );

        let counts = self.vote_repo.count_by_option(command.poll_id).await?;
        let results = PollResultsView::compute(&poll, &counts, Utc::now());

        Ok(VoteReceipt {
            vote_id: vote.id,
            poll_id: vote.poll_id,
            option_id: vote.option_id,
            created_at: vote.created_at,
            results,
        })
    }
}

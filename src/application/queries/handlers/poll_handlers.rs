//! Poll Query Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::assembler::{load_poll, restore_poll, PollResultsView, PollView};
use crate::application::error::ApplicationError;
use crate::application::ports::{PollRepositoryPort, VoteRepositoryPort};
use crate::application::queries::{GetPoll, GetPollResults, ListPolls};

/// GetPoll Handler
pub struct GetPollHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl GetPollHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, query: GetPoll) -> Result<PollView, ApplicationError> {
        let poll = load_poll(self.poll_repo.as_ref(), query.poll_id).await?;
        Ok(PollView::at(&poll, Utc::now()))
    }
}

/// ListPolls Handler
pub struct ListPollsHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl ListPollsHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, query: ListPolls) -> Result<Vec<PollView>, ApplicationError> {
        let now = Utc::now();
        let records = self.poll_repo.find_all(query.active_only).await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let options = self.poll_repo.find_options(record.id).await?;
            let poll = restore_poll(record, options)?;
            views.push(PollView::at(&poll, now));
        }
        Ok(views)
    }
}

/// GetPollResults Handler - 分组统计选票
pub struct GetPollResultsHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
}

impl GetPollResultsHandler {
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
    ) -> Self {
        Self {
            poll_repo,
            vote_repo,
        }
    }

    pub async fn handle(&self, query: GetPollResults) -> Result<PollResultsView, ApplicationError> {
        let poll = load_poll(self.poll_repo.as_ref(), query.poll_id).await?;
        let counts = self.vote_repo.count_by_option(query.poll_id).await?;
        Ok(PollResultsView::compute(&poll, &counts, Utc::now()))
    }
}

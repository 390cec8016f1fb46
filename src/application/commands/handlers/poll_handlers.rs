//! Poll Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::assembler::{
    load_poll, option_record, poll_record, OptionView, PollView,
};
use crate::application::commands::{
    AddPollOption, CreatePoll, DeletePoll, RecountPoll, SetPollActive, UpdatePoll,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{PollRepositoryPort, VoteRepositoryPort};
use crate::domain::poll::{OptionLabel, Poll, PollError, PollOption, Schedule, Title};

// ============================================================================
// CreatePoll
// ============================================================================

/// CreatePoll Handler
pub struct CreatePollHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl CreatePollHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, command: CreatePoll) -> Result<PollView, ApplicationError> {
        let title = Title::new(command.title)?;
        let schedule = Schedule::new(command.starts_at, command.ends_at)?;

        let options = command
            .options
            .into_iter()
            .enumerate()
            .map(|(position, o)| -> Result<PollOption, PollError> {
                Ok(PollOption::new(
                    OptionLabel::new(o.label)?,
                    o.description,
                    o.image_url,
                    position,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let poll = Poll::new(title, command.description, command.kind, schedule, options)?;

        let record = poll_record(&poll);
        let option_records: Vec<_> = poll
            .options()
            .iter()
            .map(|o| option_record(poll.id(), o))
            .collect();
        self.poll_repo.create(&record, &option_records).await?;

        tracing::info!(
            poll_id = %poll.id(),
            title = %poll.title(),
            kind = poll.kind().as_str(),
            options = poll.options().len(),
            "Poll created"
        );

        Ok(PollView::at(&poll, Utc::now()))
    }
}

// ============================================================================
// UpdatePoll
// ============================================================================

/// UpdatePoll Handler
pub struct UpdatePollHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl UpdatePollHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, command: UpdatePoll) -> Result<PollView, ApplicationError> {
        let mut poll = load_poll(self.poll_repo.as_ref(), command.poll_id).await?;

        let title = command.title.map(Title::new).transpose()?;
        let schedule = if command.clear_schedule {
            Some(Schedule::unbounded())
        } else if command.starts_at.is_some() || command.ends_at.is_some() {
            let current = poll.schedule();
            Some(Schedule::new(
                command.starts_at.or(current.starts_at()),
                command.ends_at.or(current.ends_at()),
            )?)
        } else {
            None
        };

        poll.revise(title, command.description, schedule)?;
        self.poll_repo.update(&poll_record(&poll)).await?;

        tracing::info!(poll_id = %poll.id(), "Poll updated");

        Ok(PollView::at(&poll, Utc::now()))
    }
}

// ============================================================================
// SetPollActive
// ============================================================================

/// SetPollActive Handler - 管理员启用 / 停用投票
pub struct SetPollActiveHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl SetPollActiveHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, command: SetPollActive) -> Result<PollView, ApplicationError> {
        let mut poll = load_poll(self.poll_repo.as_ref(), command.poll_id).await?;

        poll.set_active(command.active);
        self.poll_repo
            .set_active(*poll.id().as_uuid(), command.active, poll.updated_at())
            .await?;

        tracing::info!(
            poll_id = %poll.id(),
            active = command.active,
            "Poll activation changed"
        );

        Ok(PollView::at(&poll, Utc::now()))
    }
}

// ============================================================================
// AddPollOption
// ============================================================================

/// AddPollOption Handler
pub struct AddPollOptionHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl AddPollOptionHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, command: AddPollOption) -> Result<OptionView, ApplicationError> {
        let mut poll = load_poll(self.poll_repo.as_ref(), command.poll_id).await?;
        let poll_id = poll.id();

        let label = OptionLabel::new(command.option.label)?;
        let option = poll.add_option(label, command.option.description, command.option.image_url)?;

        self.poll_repo
            .add_option(&option_record(poll_id, option))
            .await?;

        tracing::info!(
            poll_id = %poll_id,
            option_id = %option.id(),
            label = %option.label(),
            "Poll option added"
        );

        Ok(OptionView::from(option))
    }
}

// ============================================================================
// DeletePoll
// ============================================================================

/// DeletePoll Handler
pub struct DeletePollHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
}

impl DeletePollHandler {
    pub fn new(poll_repo: Arc<dyn PollRepositoryPort>) -> Self {
        Self { poll_repo }
    }

    pub async fn handle(&self, command: DeletePoll) -> Result<(), ApplicationError> {
        let poll_id = command.poll_id;

        // 检查投票是否存在
        let poll = self
            .poll_repo
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Poll", poll_id))?;

        self.poll_repo.delete(poll_id).await?;

        tracing::info!(
            poll_id = %poll_id,
            title = %poll.title,
            "Poll deleted"
        );

        Ok(())
    }
}

// ============================================================================
// RecountPoll
// ============================================================================

/// 重新计票响应
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecountResponse {
    pub poll_id: uuid::Uuid,
    pub corrected_options: usize,
}

/// RecountPoll Handler - 用选票表校正选项累计票数
pub struct RecountPollHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
}

impl RecountPollHandler {
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
    ) -> Self {
        Self {
            poll_repo,
            vote_repo,
        }
    }

    pub async fn handle(&self, command: RecountPoll) -> Result<RecountResponse, ApplicationError> {
        let poll_id = command.poll_id;

        self.poll_repo
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Poll", poll_id))?;

        let corrected_options = self.vote_repo.recount(poll_id).await?;

        if corrected_options > 0 {
            tracing::warn!(
                poll_id = %poll_id,
                corrected_options = corrected_options,
                "Running vote counts drifted and were corrected"
            );
        } else {
            tracing::info!(poll_id = %poll_id, "Recount found no drift");
        }

        Ok(RecountResponse {
            poll_id,
            corrected_options,
        })
    }
}

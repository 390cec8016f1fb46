//! SQLite Poll Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, decode_time, decode_uuid, encode_time, DbPool};
use crate::application::ports::{
    PollOptionRecord, PollRecord, PollRepositoryPort, RepositoryError,
};
use crate::domain::poll::PollKind;

/// SQLite Poll Repository
pub struct SqlitePollRepository {
    pool: DbPool,
}

impl SqlitePollRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PollRow {
    id: String,
    title: String,
    description: Option<String>,
    kind: String,
    starts_at: Option<String>,
    ends_at: Option<String>,
    active: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PollRow> for PollRecord {
    type Error = RepositoryError;

    fn try_from(row: PollRow) -> Result<Self, Self::Error> {
        Ok(PollRecord {
            id: decode_uuid(&row.id)?,
            title: row.title,
            description: row.description,
            kind: PollKind::from_str(&row.kind).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown poll kind: {}", row.kind))
            })?,
            starts_at: row.starts_at.as_deref().map(decode_time).transpose()?,
            ends_at: row.ends_at.as_deref().map(decode_time).transpose()?,
            active: row.active != 0,
            created_at: decode_time(&row.created_at)?,
            updated_at: decode_time(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct OptionRow {
    id: String,
    poll_id: String,
    label: String,
    description: Option<String>,
    image_url: Option<String>,
    position: i64,
    vote_count: i64,
}

impl TryFrom<OptionRow> for PollOptionRecord {
    type Error = RepositoryError;

    fn try_from(row: OptionRow) -> Result<Self, Self::Error> {
        Ok(PollOptionRecord {
            id: decode_uuid(&row.id)?,
            poll_id: decode_uuid(&row.poll_id)?,
            label: row.label,
            description: row.description,
            image_url: row.image_url,
            position: row.position as usize,
            vote_count: row.vote_count.max(0) as u64,
        })
    }
}

const POLL_COLUMNS: &str =
    "id, title, description, kind, starts_at, ends_at, active, created_at, updated_at";

const OPTION_COLUMNS: &str = "id, poll_id, label, description, image_url, position, vote_count";

const INSERT_OPTION: &str = r#"
    INSERT INTO poll_options (id, poll_id, label, description, image_url, position, vote_count)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl PollRepositoryPort for SqlitePollRepository {
    async fn create(
        &self,
        poll: &PollRecord,
        options: &[PollOptionRecord],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO polls (id, title, description, kind, starts_at, ends_at, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(poll.id.to_string())
        .bind(&poll.title)
        .bind(&poll.description)
        .bind(poll.kind.as_str())
        .bind(poll.starts_at.as_ref().map(encode_time))
        .bind(poll.ends_at.as_ref().map(encode_time))
        .bind(poll.active as i64)
        .bind(encode_time(&poll.created_at))
        .bind(encode_time(&poll.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        for option in options {
            sqlx::query(INSERT_OPTION)
                .bind(option.id.to_string())
                .bind(option.poll_id.to_string())
                .bind(&option.label)
                .bind(&option.description)
                .bind(&option.image_url)
                .bind(option.position as i64)
                .bind(option.vote_count as i64)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, poll: &PollRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET title = ?, description = ?, starts_at = ?, ends_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&poll.title)
        .bind(&poll.description)
        .bind(poll.starts_at.as_ref().map(encode_time))
        .bind(poll.ends_at.as_ref().map(encode_time))
        .bind(encode_time(&poll.updated_at))
        .bind(poll.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("poll {}", poll.id)));
        }
        Ok(())
    }

    async fn set_active(
        &self,
        id: Uuid,
        active: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE polls SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active as i64)
            .bind(encode_time(&updated_at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("poll {}", id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PollRecord>, RepositoryError> {
        let sql = format!("SELECT {} FROM polls WHERE id = ?", POLL_COLUMNS);
        let row: Option<PollRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(PollRecord::try_from).transpose()
    }

    async fn find_all(&self, active_only: bool) -> Result<Vec<PollRecord>, RepositoryError> {
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM polls {} ORDER BY created_at DESC",
            POLL_COLUMNS, filter
        );
        let rows: Vec<PollRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(PollRecord::try_from).collect()
    }

    async fn find_options(&self, poll_id: Uuid) -> Result<Vec<PollOptionRecord>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM poll_options WHERE poll_id = ? ORDER BY position",
            OPTION_COLUMNS
        );
        let rows: Vec<OptionRow> = sqlx::query_as(&sql)
            .bind(poll_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(PollOptionRecord::try_from).collect()
    }

    async fn add_option(&self, option: &PollOptionRecord) -> Result<(), RepositoryError> {
        sqlx::query(INSERT_OPTION)
            .bind(option.id.to_string())
            .bind(option.poll_id.to_string())
            .bind(&option.label)
            .bind(&option.description)
            .bind(&option.image_url)
            .bind(option.position as i64)
            .bind(option.vote_count as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if super::database::is_unique_violation(&e) {
                    RepositoryError::Duplicate(format!("option position {}", option.position))
                } else {
                    db_error(e)
                }
            })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let id = id.to_string();

        // 删除关联的评论表态（通过 comments）
        sqlx::query(
            "DELETE FROM comment_reactions WHERE comment_id IN (SELECT id FROM comments WHERE poll_id = ?)",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        for sql in [
            "DELETE FROM comments WHERE poll_id = ?",
            "DELETE FROM votes WHERE poll_id = ?",
            "DELETE FROM poll_options WHERE poll_id = ?",
            "DELETE FROM polls WHERE id = ?",
        ] {
            sqlx::query(sql)
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::memory_pool;
    use chrono::{Duration, Utc};

    fn poll() -> PollRecord {
        let now = Utc::now();
        PollRecord {
            id: Uuid::new_v4(),
            title: "测试投票".to_string(),
            description: None,
            kind: PollKind::Election,
            starts_at: Some(now),
            ends_at: Some(now + Duration::days(1)),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn option(poll_id: Uuid, position: usize) -> PollOptionRecord {
        PollOptionRecord {
            id: Uuid::new_v4(),
            poll_id,
            label: format!("候选人{}", position),
            description: Some("简介".to_string()),
            image_url: None,
            position,
            vote_count: 0,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        let poll = poll();
        repo.create(&poll, &[option(poll.id, 1), option(poll.id, 0)])
            .await
            .unwrap();

        let found = repo.find_by_id(poll.id).await.unwrap().unwrap();
        assert_eq!(found.kind, PollKind::Election);
        assert!(found.active);
        assert_eq!(
            found.ends_at.map(|t| t.timestamp_micros()),
            poll.ends_at.map(|t| t.timestamp_micros())
        );

        let options = repo.find_options(poll.id).await.unwrap();
        assert_eq!(options.iter().map(|o| o.position).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_update_missing_poll() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        assert!(matches!(
            repo.update(&poll()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_content_update_keeps_activation() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        let mut stale = poll();
        repo.create(&stale, &[option(stale.id, 0)]).await.unwrap();

        // 管理员先下线投票，随后另一个请求基于旧快照修改标题
        repo.set_active(stale.id, false, Utc::now()).await.unwrap();
        stale.title = "新标题".to_string();
        repo.update(&stale).await.unwrap();

        let found = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(found.title, "新标题");
        assert!(!found.active);
    }

    #[tokio::test]
    async fn test_set_active_missing_poll() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        assert!(matches!(
            repo.set_active(Uuid::new_v4(), false, Utc::now()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_position_is_rejected() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        let poll = poll();
        repo.create(&poll, &[option(poll.id, 0)]).await.unwrap();

        assert!(matches!(
            repo.add_option(&option(poll.id, 0)).await,
            Err(RepositoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_options() {
        let repo = SqlitePollRepository::new(memory_pool().await);
        let poll = poll();
        repo.create(&poll, &[option(poll.id, 0), option(poll.id, 1)])
            .await
            .unwrap();

        repo.delete(poll.id).await.unwrap();
        assert!(repo.find_by_id(poll.id).await.unwrap().is_none());
        assert!(repo.find_options(poll.id).await.unwrap().is_empty());
    }
}

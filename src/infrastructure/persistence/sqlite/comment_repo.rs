//! SQLite Comment Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, decode_time, decode_uuid, encode_time, is_unique_violation, DbPool};
use crate::application::ports::{CommentRecord, CommentRepositoryPort, RepositoryError};
use crate::domain::comment::ReactionKind;

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    poll_id: String,
    author: String,
    content: String,
    fingerprint: String,
    ip_address: String,
    likes: i64,
    dislikes: i64,
    created_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: decode_uuid(&row.id)?,
            poll_id: decode_uuid(&row.poll_id)?,
            author: row.author,
            content: row.content,
            fingerprint: row.fingerprint,
            ip_address: row.ip_address,
            likes: row.likes.max(0) as u64,
            dislikes: row.dislikes.max(0) as u64,
            created_at: decode_time(&row.created_at)?,
        })
    }
}

const SELECT_COMMENT: &str = r#"
    SELECT id, poll_id, author, content, fingerprint, ip_address, likes, dislikes, created_at
    FROM comments
"#;

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn save(&self, comment: &CommentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, poll_id, author, content, fingerprint, ip_address, likes, dislikes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.poll_id.to_string())
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(&comment.fingerprint)
        .bind(&comment.ip_address)
        .bind(comment.likes as i64)
        .bind(comment.dislikes as i64)
        .bind(encode_time(&comment.created_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError> {
        let sql = format!("{} WHERE id = ?", SELECT_COMMENT);
        let row: Option<CommentRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(CommentRecord::try_from).transpose()
    }

    async fn find_by_poll(&self, poll_id: Uuid) -> Result<Vec<CommentRecord>, RepositoryError> {
        let sql = format!("{} WHERE poll_id = ? ORDER BY created_at DESC", SELECT_COMMENT);
        let rows: Vec<CommentRow> = sqlx::query_as(&sql)
            .bind(poll_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(CommentRecord::try_from).collect()
    }

    async fn react(
        &self,
        comment_id: Uuid,
        fingerprint: &str,
        reaction: ReactionKind,
    ) -> Result<CommentRecord, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let id = comment_id.to_string();

        let counter = match reaction {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        };
        let result = sqlx::query(&format!(
            "UPDATE comments SET {0} = {0} + 1 WHERE id = ?",
            counter
        ))
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("comment {}", comment_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO comment_reactions (comment_id, fingerprint, reaction, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(fingerprint)
        .bind(reaction.as_str())
        .bind(encode_time(&Utc::now()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate(format!("reaction on comment {}", comment_id))
            } else {
                db_error(e)
            }
        })?;

        let sql = format!("{} WHERE id = ?", SELECT_COMMENT);
        let row: CommentRow = sqlx::query_as(&sql)
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        CommentRecord::try_from(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let id = id.to_string();

        sqlx::query("DELETE FROM comment_reactions WHERE comment_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{PollOptionRecord, PollRecord, PollRepositoryPort};
    use crate::domain::poll::PollKind;
    use crate::infrastructure::persistence::sqlite::{memory_pool, SqlitePollRepository};
    use chrono::Duration;

    async fn repo_with_poll() -> (SqliteCommentRepository, Uuid) {
        let pool = memory_pool().await;
        let now = Utc::now();
        let poll = PollRecord {
            id: Uuid::new_v4(),
            title: "周末去哪".to_string(),
            description: None,
            kind: PollKind::Poll,
            starts_at: None,
            ends_at: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let options: Vec<PollOptionRecord> = (0..2)
            .map(|i| PollOptionRecord {
                id: Uuid::new_v4(),
                poll_id: poll.id,
                label: format!("地点{}", i),
                description: None,
                image_url: None,
                position: i,
                vote_count: 0,
            })
            .collect();
        SqlitePollRepository::new(pool.clone())
            .create(&poll, &options)
            .await
            .unwrap();
        (SqliteCommentRepository::new(pool), poll.id)
    }

    fn comment(poll_id: Uuid, content: &str, offset_secs: i64) -> CommentRecord {
        CommentRecord {
            id: Uuid::new_v4(),
            poll_id,
            author: "Anonymous".to_string(),
            content: content.to_string(),
            fingerprint: "fp-aaaaaaaa".to_string(),
            ip_address: "1.1.1.1".to_string(),
            likes: 0,
            dislikes: 0,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_find_by_poll_newest_first() {
        let (repo, poll_id) = repo_with_poll().await;
        repo.save(&comment(poll_id, "第一条", 0)).await.unwrap();
        repo.save(&comment(poll_id, "第二条", 5)).await.unwrap();

        let comments = repo.find_by_poll(poll_id).await.unwrap();
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["第二条", "第一条"]);
    }

    #[tokio::test]
    async fn test_react_once_per_fingerprint() {
        let (repo, poll_id) = repo_with_poll().await;
        let c = comment(poll_id, "支持", 0);
        repo.save(&c).await.unwrap();

        let updated = repo.react(c.id, "fp-bbbbbbbb", ReactionKind::Like).await.unwrap();
        assert_eq!((updated.likes, updated.dislikes), (1, 0));

        let again = repo.react(c.id, "fp-bbbbbbbb", ReactionKind::Dislike).await;
        assert!(matches!(again, Err(RepositoryError::Duplicate(_))));

        let stored = repo.find_by_id(c.id).await.unwrap().unwrap();
        assert_eq!((stored.likes, stored.dislikes), (1, 0));

        let other = repo.react(c.id, "fp-cccccccc", ReactionKind::Dislike).await.unwrap();
        assert_eq!((other.likes, other.dislikes), (1, 1));
    }

    #[tokio::test]
    async fn test_react_missing_comment() {
        let (repo, _) = repo_with_poll().await;
        let result = repo.react(Uuid::new_v4(), "fp-bbbbbbbb", ReactionKind::Like).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let (repo, poll_id) = repo_with_poll().await;
        let c = comment(poll_id, "删掉我", 0);
        repo.save(&c).await.unwrap();
        repo.react(c.id, "fp-bbbbbbbb", ReactionKind::Like).await.unwrap();

        repo.delete(c.id).await.unwrap();
        assert!(repo.find_by_id(c.id).await.unwrap().is_none());
    }
}

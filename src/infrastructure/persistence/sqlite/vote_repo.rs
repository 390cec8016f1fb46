//! SQLite Vote Repository
//!
//! 选票写入与选项计数在同一事务内完成：
//! 先插入选票（由唯一索引兜底同指纹同 IP），再按策略检查其它重复，
//! 最后累加选项票数。任一步失败整个事务回滚。

use async_trait::async_trait;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::database::{db_error, decode_time, decode_uuid, encode_time, is_unique_violation, DbPool};
use crate::application::ports::{RepositoryError, VoteRecord, VoteRepositoryPort};
use crate::domain::ballot::{DedupPolicy, VoterIdentity};

/// SQLite Vote Repository
pub struct SqliteVoteRepository {
    pool: DbPool,
}

impl SqliteVoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VoteRow {
    id: String,
    poll_id: String,
    option_id: String,
    fingerprint: String,
    ip_address: String,
    created_at: String,
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = RepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            id: decode_uuid(&row.id)?,
            poll_id: decode_uuid(&row.poll_id)?,
            option_id: decode_uuid(&row.option_id)?,
            fingerprint: row.fingerprint,
            ip_address: row.ip_address,
            created_at: decode_time(&row.created_at)?,
        })
    }
}

/// 各策略下判定同一投票人的条件（参数顺序：fingerprint, ip_address）
fn voter_clause(policy: DedupPolicy) -> &'static str {
    match policy {
        DedupPolicy::FingerprintAndIp => "fingerprint = ?1 AND ip_address = ?2",
        DedupPolicy::FingerprintOnly => "fingerprint = ?1",
        DedupPolicy::FingerprintOrIp => "(fingerprint = ?1 OR ip_address = ?2)",
    }
}

#[async_trait]
impl VoteRepositoryPort for SqliteVoteRepository {
    async fn record(&self, vote: &VoteRecord, policy: DedupPolicy) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO votes (id, poll_id, option_id, fingerprint, ip_address, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(vote.id.to_string())
        .bind(vote.poll_id.to_string())
        .bind(vote.option_id.to_string())
        .bind(&vote.fingerprint)
        .bind(&vote.ip_address)
        .bind(encode_time(&vote.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate(format!("vote on poll {}", vote.poll_id))
            } else {
                db_error(e)
            }
        })?;

        // 唯一索引只覆盖 (指纹, IP) 同时相同的情况
        if policy != DedupPolicy::FingerprintAndIp {
            let sql = format!(
                "SELECT COUNT(*) FROM votes WHERE {} AND poll_id = ?3 AND id != ?4",
                voter_clause(policy)
            );
            let others: i64 = sqlx::query_scalar(&sql)
                .bind(&vote.fingerprint)
                .bind(&vote.ip_address)
                .bind(vote.poll_id.to_string())
                .bind(vote.id.to_string())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;

            if others > 0 {
                return Err(RepositoryError::Duplicate(format!(
                    "vote on poll {}",
                    vote.poll_id
                )));
            }
        }

        let result = sqlx::query(
            "UPDATE poll_options SET vote_count = vote_count + 1 WHERE id = ? AND poll_id = ?",
        )
        .bind(vote.option_id.to_string())
        .bind(vote.poll_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "option {} in poll {}",
                vote.option_id, vote.poll_id
            )));
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn find_by_voter(
        &self,
        poll_id: Uuid,
        voter: &VoterIdentity,
        policy: DedupPolicy,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT id, poll_id, option_id, fingerprint, ip_address, created_at
            FROM votes
            WHERE {} AND poll_id = ?3
            ORDER BY created_at
            LIMIT 1
            "#,
            voter_clause(policy)
        );
        let row: Option<VoteRow> = sqlx::query_as(&sql)
            .bind(voter.fingerprint().as_str())
            .bind(voter.ip_address())
            .bind(poll_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(VoteRecord::try_from).transpose()
    }

    async fn count_by_option(&self, poll_id: Uuid) -> Result<HashMap<Uuid, u64>, RepositoryError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT option_id, COUNT(*) FROM votes WHERE poll_id = ? GROUP BY option_id",
        )
        .bind(poll_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|(option_id, votes)| Ok((decode_uuid(&option_id)?, votes.max(0) as u64)))
            .collect()
    }

    async fn recount(&self, poll_id: Uuid) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 以选票表为准，找出累计值与实际票数不一致的选项
        let drifted: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT o.id, COUNT(v.id) AS actual
            FROM poll_options o
            LEFT JOIN votes v ON v.option_id = o.id AND v.poll_id = o.poll_id
            WHERE o.poll_id = ?
            GROUP BY o.id, o.vote_count
            HAVING o.vote_count != COUNT(v.id)
            "#,
        )
        .bind(poll_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        for (option_id, actual) in &drifted {
            sqlx::query("UPDATE poll_options SET vote_count = ? WHERE id = ?")
                .bind(actual)
                .bind(option_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        if !drifted.is_empty() {
            tracing::warn!(
                "Recount corrected {} option(s) in poll {}",
                drifted.len(),
                poll_id
            );
        }
        Ok(drifted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{PollOptionRecord, PollRecord, PollRepositoryPort};
    use crate::domain::ballot::Fingerprint;
    use crate::domain::poll::PollKind;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, memory_pool, run_migrations, DatabaseConfig, SqlitePollRepository,
    };
    use chrono::Utc;
    use std::sync::Arc;

    struct Fixture {
        pool: DbPool,
        poll_id: Uuid,
        options: Vec<Uuid>,
    }

    async fn fixture() -> Fixture {
        seed(memory_pool().await).await
    }

    async fn seed(pool: DbPool) -> Fixture {
        let now = Utc::now();
        let poll = PollRecord {
            id: Uuid::new_v4(),
            title: "午饭吃什么".to_string(),
            description: None,
            kind: PollKind::Poll,
            starts_at: None,
            ends_at: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let options: Vec<PollOptionRecord> = ["面", "饭"]
            .iter()
            .enumerate()
            .map(|(i, label)| PollOptionRecord {
                id: Uuid::new_v4(),
                poll_id: poll.id,
                label: label.to_string(),
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

        Fixture {
            pool,
            poll_id: poll.id,
            options: options.iter().map(|o| o.id).collect(),
        }
    }

    fn vote(poll_id: Uuid, option_id: Uuid, fp: &str, ip: &str) -> VoteRecord {
        VoteRecord {
            id: Uuid::new_v4(),
            poll_id,
            option_id,
            fingerprint: fp.to_string(),
            ip_address: ip.to_string(),
            created_at: Utc::now(),
        }
    }

    async fn stored_counts(pool: &DbPool, poll_id: Uuid) -> Vec<i64> {
        sqlx::query_scalar("SELECT vote_count FROM poll_options WHERE poll_id = ? ORDER BY position")
            .bind(poll_id.to_string())
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_increments_count() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        let policy = DedupPolicy::default();

        repo.record(&vote(f.poll_id, f.options[0], "fp-aaaaaaaa", "1.1.1.1"), policy)
            .await
            .unwrap();
        repo.record(&vote(f.poll_id, f.options[0], "fp-bbbbbbbb", "1.1.1.1"), policy)
            .await
            .unwrap();

        assert_eq!(stored_counts(&f.pool, f.poll_id).await, vec![2, 0]);
        let counts = repo.count_by_option(f.poll_id).await.unwrap();
        assert_eq!(counts.get(&f.options[0]), Some(&2));
        assert_eq!(counts.get(&f.options[1]), None);
    }

    #[tokio::test]
    async fn test_duplicate_leaves_no_trace() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        let policy = DedupPolicy::FingerprintAndIp;

        repo.record(&vote(f.poll_id, f.options[0], "fp-aaaaaaaa", "1.1.1.1"), policy)
            .await
            .unwrap();
        let second = repo
            .record(&vote(f.poll_id, f.options[1], "fp-aaaaaaaa", "1.1.1.1"), policy)
            .await;

        assert!(matches!(second, Err(RepositoryError::Duplicate(_))));
        assert_eq!(stored_counts(&f.pool, f.poll_id).await, vec![1, 0]);
    }

    #[tokio::test]
    async fn test_fingerprint_only_policy() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        let policy = DedupPolicy::FingerprintOnly;

        repo.record(&vote(f.poll_id, f.options[0], "fp-aaaaaaaa", "1.1.1.1"), policy)
            .await
            .unwrap();
        // 换 IP 仍是同一指纹
        let second = repo
            .record(&vote(f.poll_id, f.options[1], "fp-aaaaaaaa", "2.2.2.2"), policy)
            .await;
        assert!(matches!(second, Err(RepositoryError::Duplicate(_))));

        // 同 IP 不同指纹允许
        repo.record(&vote(f.poll_id, f.options[1], "fp-bbbbbbbb", "1.1.1.1"), policy)
            .await
            .unwrap();
        assert_eq!(stored_counts(&f.pool, f.poll_id).await, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_foreign_option_is_rolled_back() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());

        let result = repo
            .record(
                &vote(f.poll_id, Uuid::new_v4(), "fp-aaaaaaaa", "1.1.1.1"),
                DedupPolicy::default(),
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert!(repo.count_by_option(f.poll_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_voter_per_policy() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        repo.record(
            &vote(f.poll_id, f.options[1], "fp-aaaaaaaa", "1.1.1.1"),
            DedupPolicy::default(),
        )
        .await
        .unwrap();

        let same_ip = VoterIdentity::new(Fingerprint::new("fp-cccccccc").unwrap(), "1.1.1.1");
        assert!(repo
            .find_by_voter(f.poll_id, &same_ip, DedupPolicy::FingerprintAndIp)
            .await
            .unwrap()
            .is_none());

        let found = repo
            .find_by_voter(f.poll_id, &same_ip, DedupPolicy::FingerprintOrIp)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.option_id, f.options[1]);
    }

    #[tokio::test]
    async fn test_voter_clause_agrees_with_policy() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        let existing = VoterIdentity::new(Fingerprint::new("fp-aaaaaaaa").unwrap(), "1.1.1.1");
        repo.record(
            &vote(f.poll_id, f.options[0], "fp-aaaaaaaa", "1.1.1.1"),
            DedupPolicy::default(),
        )
        .await
        .unwrap();

        let candidates = [
            ("fp-aaaaaaaa", "1.1.1.1"),
            ("fp-aaaaaaaa", "2.2.2.2"),
            ("fp-bbbbbbbb", "1.1.1.1"),
            ("fp-bbbbbbbb", "2.2.2.2"),
        ];
        let policies = [
            DedupPolicy::FingerprintAndIp,
            DedupPolicy::FingerprintOnly,
            DedupPolicy::FingerprintOrIp,
        ];

        for policy in policies {
            for (fp, ip) in candidates {
                let candidate = VoterIdentity::new(Fingerprint::new(fp).unwrap(), ip);
                let found = repo
                    .find_by_voter(f.poll_id, &candidate, policy)
                    .await
                    .unwrap();
                assert_eq!(
                    found.is_some(),
                    policy.matches(&existing, &candidate),
                    "{policy} {fp} {ip}"
                );
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_voters_single_winner() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&DatabaseConfig::new(dir.path().join("votes.db")))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let f = seed(pool).await;
        let repo = Arc::new(SqliteVoteRepository::new(f.pool.clone()));

        // 同一指纹、不同 IP，只能靠事务内的策略检查拦截
        let tasks: Vec<_> = (0..30)
            .map(|i| {
                let repo = repo.clone();
                let ballot = vote(
                    f.poll_id,
                    f.options[i % 2],
                    "fp-same-browser",
                    &format!("10.0.0.{}", i),
                );
                tokio::spawn(async move {
                    repo.record(&ballot, DedupPolicy::FingerprintOnly).await
                })
            })
            .collect();

        let mut accepted = 0;
        let mut duplicates = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(RepositoryError::Duplicate(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(duplicates, 29);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE poll_id = ?")
            .bind(f.poll_id.to_string())
            .fetch_one(&f.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(stored_counts(&f.pool, f.poll_id).await.iter().sum::<i64>(), 1);
    }

    #[tokio::test]
    async fn test_recount_fixes_drift() {
        let f = fixture().await;
        let repo = SqliteVoteRepository::new(f.pool.clone());
        repo.record(
            &vote(f.poll_id, f.options[0], "fp-aaaaaaaa", "1.1.1.1"),
            DedupPolicy::default(),
        )
        .await
        .unwrap();

        sqlx::query("UPDATE poll_options SET vote_count = 7 WHERE poll_id = ?")
            .bind(f.poll_id.to_string())
            .execute(&f.pool)
            .await
            .unwrap();

        assert_eq!(repo.recount(f.poll_id).await.unwrap(), 2);
        assert_eq!(stored_counts(&f.pool, f.poll_id).await, vec![1, 0]);
        assert_eq!(repo.recount(f.poll_id).await.unwrap(), 0);
    }
}

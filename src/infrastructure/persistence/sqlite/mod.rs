//! SQLite Persistence - SQLite 数据库持久化实现

mod comment_repo;
mod database;
mod poll_repo;
mod vote_repo;

pub use comment_repo::SqliteCommentRepository;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use poll_repo::SqlitePollRepository;
pub use vote_repo::SqliteVoteRepository;

#[cfg(test)]
pub(crate) use database::memory_pool;

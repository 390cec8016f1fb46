//! Ballotbox - 匿名在线投票 / 选举服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Poll Context: 投票、选项、时间窗口、计票
//! - Ballot Context: 投票人指纹、身份与去重策略
//! - Comment Context: 评论与表态
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Poll / Vote / Comment Repositories）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + 静态前端托管
//! - Persistence: SQLite 存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

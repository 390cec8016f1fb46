//! Ballotbox - 匿名在线投票服务
//!
//! - Domain: poll/, ballot/, comment/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence

use std::sync::Arc;

use ballotbox::config::{load_config, print_config, AppConfig};
use ballotbox::infrastructure::http::{AccessSettings, AppState, HttpServer, ServerConfig};
use ballotbox::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteCommentRepository, SqlitePollRepository,
    SqliteVoteRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Ballotbox - 匿名在线投票服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let poll_repo = Arc::new(SqlitePollRepository::new(pool.clone()));
    let vote_repo = Arc::new(SqliteVoteRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            &config.server.static_files.dir,
            &config.server.static_files.path,
        );
    }
    let state = AppState::new(
        poll_repo,
        vote_repo,
        comment_repo,
        AccessSettings {
            dedup_policy: config.vote.dedup_policy,
            admin_token: config.admin.token.clone(),
            trust_proxy_headers: config.vote.trust_proxy_headers,
        },
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Listening at {}", config.server.public_base_url());

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志（RUST_LOG 优先于配置）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},ballotbox={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

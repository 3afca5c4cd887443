//! Novelist - 小说构思与写作服务
//!
//! 启动顺序: 配置 -> 日志 -> 数据库 -> 示例数据 -> LLM 客户端 -> HTTP 服务

use std::sync::Arc;

use novelist::config::{load_config, print_config};
use novelist::infrastructure::adapters::{OpenAiClientConfig, OpenAiTextGenerator};
use novelist::infrastructure::http::{AppState, HttpServer, ServerConfig};
use novelist::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, seed_sample_data, DatabaseConfig, SqliteChapterRepository,
    SqliteCharacterRepository, SqliteNovelRepository, SqliteSettingRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},novelist={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Novelist - 小说构思与写作服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    if config.seed.enabled {
        if let Some(novel_id) = seed_sample_data(&pool).await? {
            tracing::info!(novel_id, "Seeded sample novel");
        }
    }

    // 创建 Repository 适配器
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let character_repo = Arc::new(SqliteCharacterRepository::new(pool.clone()));
    let setting_repo = Arc::new(SqliteSettingRepository::new(pool));

    // 创建 LLM 客户端；未配置 API key 时生成接口返回 500，其余接口照常工作
    let mut llm_config = OpenAiClientConfig::new(&config.ai.base_url)
        .with_model(&config.ai.model)
        .with_timeout(config.ai.timeout_secs);
    match &config.ai.api_key {
        Some(key) => llm_config = llm_config.with_api_key(key),
        None => tracing::warn!("AI API key not configured, generation endpoints are disabled"),
    }
    let text_generator = Arc::new(OpenAiTextGenerator::new(llm_config)?);

    let state = AppState::new(
        novel_repo,
        chapter_repo,
        character_repo,
        setting_repo,
        text_generator,
        &config.ai.language,
    );

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            &config.server.static_files.dir,
            &config.server.static_files.path,
        );
    }

    let server = HttpServer::new(server_config, state);

    tracing::info!(url = %config.server.public_base_url(), "Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

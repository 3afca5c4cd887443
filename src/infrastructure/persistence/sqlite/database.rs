//! SQLite Database - 数据库连接和迁移

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

use crate::application::ports::RepositoryError;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库连接 URL
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/novelist.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>, max_connections: u32) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections,
        }
    }

    /// 内存数据库只能有一个连接，否则每个连接各自是一个独立的库
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
///
/// sqlx 的 SQLite 连接默认开启 foreign_keys
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let mut options = SqlitePoolOptions::new().max_connections(config.max_connections);
    // 内存库随最后一个连接关闭而消失
    if config.database_url.contains(":memory:") {
        options = options.idle_timeout(None).max_lifetime(None);
    }
    let pool = options.connect(&config.database_url).await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!(
        url = %config.database_url,
        max_connections = config.max_connections,
        "SQLite pool created with WAL mode and busy_timeout=5000ms"
    );

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS novels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            genre TEXT NOT NULL,
            summary TEXT,
            target_word_count INTEGER NOT NULL DEFAULT 50000,
            status TEXT NOT NULL DEFAULT 'planning',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // order_index 不设 UNIQUE：重排事务的中间状态会出现重复
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            novel_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT,
            order_index INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL,
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // traits 以 JSON 数组文本存储
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            novel_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            description TEXT,
            traits TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            novel_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 索引
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_chapters_novel_order
        ON chapters(novel_id, order_index)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_characters_novel_id
        ON characters(novel_id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_settings_novel_id
        ON settings(novel_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 解析 RFC 3339 时间戳列
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();
    }

    #[test]
    fn test_database_url_from_path() {
        let config = DatabaseConfig::new("data/novelist.db", 3);
        assert_eq!(config.database_url, "sqlite:data/novelist.db?mode=rwc");
        assert_eq!(config.max_connections, 3);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("2024-05-01T10:00:00+00:00").is_ok());
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(RepositoryError::SerializationError(_))
        ));
    }
}

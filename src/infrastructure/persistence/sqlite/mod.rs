//! SQLite Persistence - SQLite 数据库持久化实现

mod chapter_repo;
mod character_repo;
mod database;
mod novel_repo;
mod seed;
mod setting_repo;

pub use chapter_repo::*;
pub use character_repo::*;
pub use database::*;
pub use novel_repo::*;
pub use seed::*;
pub use setting_repo::*;

/// 已完成迁移的内存数据库（测试用）
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let pool = create_pool(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

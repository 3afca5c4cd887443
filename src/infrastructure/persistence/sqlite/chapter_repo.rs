//! SQLite Chapter Repository
//!
//! 所有改变同一小说内 order_index 分布的写操作都在事务内完成：
//! 插入（追加或插入指定位置）、移动、删除后压缩、批量重排。
//! 每次写入后 order_index 仍是 [0, N) 的排列。

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqliteConnection};

use super::{parse_timestamp, DbPool};
use crate::application::ports::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, NewChapter, RepositoryError,
};
use crate::domain::novel::{ChapterStatus, ReorderPlan};

const CHAPTER_COLUMNS: &str = "id, novel_id, title, content, order_index, status, created_at";

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: i64,
    novel_id: i64,
    title: String,
    content: Option<String>,
    order_index: i64,
    status: String,
    created_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let status = ChapterStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown chapter status '{}'", row.status))
        })?;

        Ok(ChapterRecord {
            id: row.id,
            novel_id: row.novel_id,
            title: row.title,
            content: row.content,
            order_index: row.order_index,
            status,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

async fn sibling_count(conn: &mut SqliteConnection, novel_id: i64) -> Result<i64, RepositoryError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chapters WHERE novel_id = ?")
        .bind(novel_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn insert(&self, chapter: &NewChapter) -> Result<ChapterRecord, RepositoryError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let count = sibling_count(&mut tx, chapter.novel_id).await?;

        // 未指定位置时追加到末尾；指定位置时为新章节腾出该位置
        let order_index = match chapter.order_index {
            Some(index) => {
                let index = index.clamp(0, count);
                sqlx::query(
                    "UPDATE chapters SET order_index = order_index + 1 WHERE novel_id = ? AND order_index >= ?",
                )
                .bind(chapter.novel_id)
                .bind(index)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
                index
            }
            None => count,
        };

        let id = sqlx::query(
            r#"
            INSERT INTO chapters (novel_id, title, content, order_index, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.novel_id)
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(order_index)
        .bind(chapter.status.as_str())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(ChapterRecord {
            id,
            novel_id: chapter.novel_id,
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            order_index,
            status: chapter.status,
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_novel(&self, novel_id: i64) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE novel_id = ? ORDER BY order_index, id",
            CHAPTER_COLUMNS
        ))
        .bind(novel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &ChapterChanges,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut chapter = ChapterRecord::try_from(row)?;
        let current = chapter.order_index;
        chapter.apply(changes);

        if chapter.order_index != current {
            let count = sibling_count(&mut tx, chapter.novel_id).await?;
            let target = chapter.order_index.clamp(0, count - 1);

            // 目标与原位置之间的章节各顺移一位
            let shift = if target < current {
                Some((
                    "UPDATE chapters SET order_index = order_index + 1 \
                     WHERE novel_id = ? AND order_index >= ? AND order_index < ?",
                    target,
                    current,
                ))
            } else if target > current {
                Some((
                    "UPDATE chapters SET order_index = order_index - 1 \
                     WHERE novel_id = ? AND order_index > ? AND order_index <= ?",
                    current,
                    target,
                ))
            } else {
                None
            };

            if let Some((sql, low, high)) = shift {
                sqlx::query(sql)
                    .bind(chapter.novel_id)
                    .bind(low)
                    .bind(high)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            }
            chapter.order_index = target;
        }

        sqlx::query(
            r#"
            UPDATE chapters
            SET title = ?, content = ?, order_index = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(chapter.order_index)
        .bind(chapter.status.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Some(chapter))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let position: Option<(i64, i64)> =
            sqlx::query_as("SELECT novel_id, order_index FROM chapters WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some((novel_id, order_index)) = position else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        // 后续章节前移一位
        sqlx::query(
            "UPDATE chapters SET order_index = order_index - 1 WHERE novel_id = ? AND order_index > ?",
        )
        .bind(novel_id)
        .bind(order_index)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(true)
    }

    async fn reorder(&self, novel_id: i64, plan: &ReorderPlan) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let current_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM chapters WHERE novel_id = ?")
                .bind(novel_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        // tx 未提交即被丢弃，sqlx 会自动回滚
        if let Err(e) = plan.validate_against(&current_ids) {
            tracing::warn!(novel_id = novel_id, error = %e, "Reorder rejected");
            return Err(e.into());
        }

        for order in plan.orders() {
            let affected = sqlx::query(
                "UPDATE chapters SET order_index = ? WHERE id = ? AND novel_id = ?",
            )
            .bind(order.order_index)
            .bind(order.chapter_id)
            .bind(novel_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

            if affected != 1 {
                tracing::warn!(
                    novel_id = novel_id,
                    chapter_id = order.chapter_id,
                    "Reorder aborted, chapter not found in novel"
                );
                return Err(RepositoryError::NotFound(format!(
                    "chapter {} in novel {}",
                    order.chapter_id, novel_id
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

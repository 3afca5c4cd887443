//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{parse_timestamp, DbPool};
use crate::application::ports::{
    NewNovel, NovelChanges, NovelRecord, NovelRepositoryPort, RepositoryError,
};
use crate::domain::novel::NovelStatus;

const NOVEL_COLUMNS: &str =
    "id, title, genre, summary, target_word_count, status, created_at, updated_at";

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: i64,
    title: String,
    genre: String,
    summary: Option<String>,
    target_word_count: i64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        let status = NovelStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown novel status '{}'", row.status))
        })?;

        Ok(NovelRecord {
            id: row.id,
            title: row.title,
            genre: row.genre,
            summary: row.summary,
            target_word_count: row.target_word_count,
            status,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn insert(&self, novel: &NewNovel) -> Result<NovelRecord, RepositoryError> {
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO novels (title, genre, summary, target_word_count, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&novel.title)
        .bind(&novel.genre)
        .bind(&novel.summary)
        .bind(novel.target_word_count)
        .bind(novel.status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .last_insert_rowid();

        Ok(NovelRecord {
            id,
            title: novel.title.clone(),
            genre: novel.genre.clone(),
            summary: novel.summary.clone(),
            target_word_count: novel.target_word_count,
            status: novel.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> =
            sqlx::query_as(&format!("SELECT {} FROM novels WHERE id = ?", NOVEL_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError> {
        let rows: Vec<NovelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM novels ORDER BY title, id",
            NOVEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(NovelRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &NovelChanges,
    ) -> Result<Option<NovelRecord>, RepositoryError> {
        let Some(mut novel) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        novel.apply(changes, Utc::now());

        sqlx::query(
            r#"
            UPDATE novels
            SET title = ?, genre = ?, summary = ?, target_word_count = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&novel.title)
        .bind(&novel.genre)
        .bind(&novel.summary)
        .bind(novel.target_word_count)
        .bind(novel.status.as_str())
        .bind(novel.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Some(novel))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for table in ["chapters", "characters", "settings"] {
            sqlx::query(&format!("DELETE FROM {} WHERE novel_id = ?", table))
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        let deleted = sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ChapterRepositoryPort, CharacterRepositoryPort, NewChapter, NewCharacter, NewSetting,
        SettingRepositoryPort,
    };
    use crate::domain::novel::{ChapterStatus, CharacterRole};
    use crate::infrastructure::persistence::sqlite::{
        test_pool, SqliteChapterRepository, SqliteCharacterRepository, SqliteSettingRepository,
    };

    fn new_novel(title: &str) -> NewNovel {
        NewNovel {
            title: title.to_string(),
            genre: "Drama".to_string(),
            summary: Some("A story".to_string()),
            target_word_count: 80_000,
            status: NovelStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = SqliteNovelRepository::new(test_pool().await);

        let inserted = repo.insert(&new_novel("T")).await.unwrap();
        let found = repo.find_by_id(inserted.id).await.unwrap().unwrap();

        assert_eq!(found, inserted);
        assert!(repo.find_by_id(inserted.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_status_is_serialization_error() {
        let repo = SqliteNovelRepository::new(test_pool().await);
        let novel = repo.insert(&new_novel("Corrupt")).await.unwrap();

        sqlx::query("UPDATE novels SET status = 'bogus' WHERE id = ?")
            .bind(novel.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.find_by_id(novel.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::SerializationError(_)));
        assert!(repo.find_all().await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = SqliteNovelRepository::new(test_pool().await);
        let result = repo
            .update(
                7,
                &NovelChanges {
                    title: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let repo = SqliteNovelRepository::new(test_pool().await);
        let novel = repo.insert(&new_novel("T")).await.unwrap();

        repo.update(
            novel.id,
            &NovelChanges {
                genre: Some("Mystery".to_string()),
                status: Some(NovelStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stored = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(stored.genre, "Mystery");
        assert_eq!(stored.status, NovelStatus::Completed);
        assert_eq!(stored.title, "T");
        assert_eq!(stored.created_at, novel.created_at);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_children() {
        let pool = test_pool().await;
        let novels = SqliteNovelRepository::new(pool.clone());
        let chapters = SqliteChapterRepository::new(pool.clone());
        let characters = SqliteCharacterRepository::new(pool.clone());
        let settings = SqliteSettingRepository::new(pool);

        let novel = novels.insert(&new_novel("T")).await.unwrap();
        let other = novels.insert(&new_novel("Other")).await.unwrap();
        for novel_id in [novel.id, other.id] {
            chapters
                .insert(&NewChapter {
                    novel_id,
                    title: "Ch1".to_string(),
                    content: None,
                    order_index: None,
                    status: ChapterStatus::Draft,
                })
                .await
                .unwrap();
        }
        characters
            .insert(&NewCharacter {
                novel_id: novel.id,
                name: "Ahmad".to_string(),
                role: CharacterRole::Protagonist,
                description: None,
                traits: vec!["Brave".to_string()],
            })
            .await
            .unwrap();
        settings
            .insert(&NewSetting {
                novel_id: novel.id,
                name: "Old Cairo".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert!(novels.delete(novel.id).await.unwrap());

        assert!(novels.find_by_id(novel.id).await.unwrap().is_none());
        assert!(chapters.find_by_novel(novel.id).await.unwrap().is_empty());
        assert!(characters.find_by_novel(novel.id).await.unwrap().is_empty());
        assert!(settings.find_by_novel(novel.id).await.unwrap().is_empty());
        // 其他小说不受影响
        assert_eq!(chapters.find_by_novel(other.id).await.unwrap().len(), 1);

        assert!(!novels.delete(novel.id).await.unwrap());
    }
}

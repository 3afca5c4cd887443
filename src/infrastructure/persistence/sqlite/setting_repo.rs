//! SQLite Setting Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{parse_timestamp, DbPool};
use crate::application::ports::{
    NewSetting, RepositoryError, SettingChanges, SettingRecord, SettingRepositoryPort,
};

/// SQLite Setting Repository
pub struct SqliteSettingRepository {
    pool: DbPool,
}

impl SqliteSettingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SettingRow {
    id: i64,
    novel_id: i64,
    name: String,
    description: Option<String>,
    created_at: String,
}

impl TryFrom<SettingRow> for SettingRecord {
    type Error = RepositoryError;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        Ok(SettingRecord {
            id: row.id,
            novel_id: row.novel_id,
            name: row.name,
            description: row.description,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl SettingRepositoryPort for SqliteSettingRepository {
    async fn insert(&self, setting: &NewSetting) -> Result<SettingRecord, RepositoryError> {
        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO settings (novel_id, name, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(setting.novel_id)
        .bind(&setting.name)
        .bind(&setting.description)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .last_insert_rowid();

        Ok(SettingRecord {
            id,
            novel_id: setting.novel_id,
            name: setting.name.clone(),
            description: setting.description.clone(),
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SettingRecord>, RepositoryError> {
        let row: Option<SettingRow> = sqlx::query_as(
            "SELECT id, novel_id, name, description, created_at FROM settings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(SettingRecord::try_from).transpose()
    }

    async fn find_by_novel(&self, novel_id: i64) -> Result<Vec<SettingRecord>, RepositoryError> {
        let rows: Vec<SettingRow> = sqlx::query_as(
            "SELECT id, novel_id, name, description, created_at FROM settings WHERE novel_id = ? ORDER BY id",
        )
        .bind(novel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(SettingRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &SettingChanges,
    ) -> Result<Option<SettingRecord>, RepositoryError> {
        let Some(mut setting) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        setting.apply(changes);

        sqlx::query("UPDATE settings SET name = ?, description = ? WHERE id = ?")
            .bind(&setting.name)
            .bind(&setting.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Some(setting))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM settings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

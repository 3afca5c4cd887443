//! SQLite Character Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{parse_timestamp, DbPool};
use crate::application::ports::{
    CharacterChanges, CharacterRecord, CharacterRepositoryPort, NewCharacter, RepositoryError,
};
use crate::domain::novel::CharacterRole;

const CHARACTER_COLUMNS: &str = "id, novel_id, name, role, description, traits, created_at";

/// SQLite Character Repository
pub struct SqliteCharacterRepository {
    pool: DbPool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CharacterRow {
    id: i64,
    novel_id: i64,
    name: String,
    role: String,
    description: Option<String>,
    traits: String,
    created_at: String,
}

impl TryFrom<CharacterRow> for CharacterRecord {
    type Error = RepositoryError;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        let role = CharacterRole::from_str(&row.role).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown character role '{}'", row.role))
        })?;
        let traits: Vec<String> = serde_json::from_str(&row.traits)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(CharacterRecord {
            id: row.id,
            novel_id: row.novel_id,
            name: row.name,
            role,
            description: row.description,
            traits,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn encode_traits(traits: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(traits).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[async_trait]
impl CharacterRepositoryPort for SqliteCharacterRepository {
    async fn insert(&self, character: &NewCharacter) -> Result<CharacterRecord, RepositoryError> {
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO characters (novel_id, name, role, description, traits, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(character.novel_id)
        .bind(&character.name)
        .bind(character.role.as_str())
        .bind(&character.description)
        .bind(encode_traits(&character.traits)?)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .last_insert_rowid();

        Ok(CharacterRecord {
            id,
            novel_id: character.novel_id,
            name: character.name.clone(),
            role: character.role,
            description: character.description.clone(),
            traits: character.traits.clone(),
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CharacterRecord>, RepositoryError> {
        let row: Option<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM characters WHERE id = ?",
            CHARACTER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(CharacterRecord::try_from).transpose()
    }

    async fn find_by_novel(
        &self,
        novel_id: i64,
    ) -> Result<Vec<CharacterRecord>, RepositoryError> {
        let rows: Vec<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM characters WHERE novel_id = ? ORDER BY id",
            CHARACTER_COLUMNS
        ))
        .bind(novel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(CharacterRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &CharacterChanges,
    ) -> Result<Option<CharacterRecord>, RepositoryError> {
        let Some(mut character) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        character.apply(changes);

        sqlx::query(
            "UPDATE characters SET name = ?, role = ?, description = ?, traits = ? WHERE id = ?",
        )
        .bind(&character.name)
        .bind(character.role.as_str())
        .bind(&character.description)
        .bind(encode_traits(&character.traits)?)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Some(character))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{NewNovel, NovelRepositoryPort};
    use crate::domain::novel::NovelStatus;
    use crate::infrastructure::persistence::sqlite::{test_pool, SqliteNovelRepository};

    #[tokio::test]
    async fn test_traits_round_trip_in_order() {
        let pool = test_pool().await;
        let novel = SqliteNovelRepository::new(pool.clone())
            .insert(&NewNovel {
                title: "T".to_string(),
                genre: "Drama".to_string(),
                summary: None,
                target_word_count: 50_000,
                status: NovelStatus::Planning,
            })
            .await
            .unwrap();
        let repo = SqliteCharacterRepository::new(pool);

        let created = repo
            .insert(&NewCharacter {
                novel_id: novel.id,
                name: "Layla".to_string(),
                role: CharacterRole::Supporting,
                description: Some("Neighbour".to_string()),
                traits: vec!["Kind".to_string(), "Curious".to_string()],
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                &CharacterChanges {
                    role: Some(CharacterRole::Antagonist),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.traits, vec!["Kind", "Curious"]);

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.role, CharacterRole::Antagonist);
        assert_eq!(stored.traits, vec!["Kind", "Curious"]);
        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}

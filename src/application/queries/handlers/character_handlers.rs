//! Character Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CharacterRecord, CharacterRepositoryPort, NovelRepositoryPort};
use crate::application::queries::{GetCharacter, ListCharacters};

/// GetCharacter Handler
pub struct GetCharacterHandler {
    character_repo: Arc<dyn CharacterRepositoryPort>,
}

impl GetCharacterHandler {
    pub fn new(character_repo: Arc<dyn CharacterRepositoryPort>) -> Self {
        Self { character_repo }
    }

    pub async fn handle(&self, query: GetCharacter) -> Result<CharacterRecord, ApplicationError> {
        self.character_repo
            .find_by_id(query.character_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Character", query.character_id))
    }
}

/// ListCharacters Handler
pub struct ListCharactersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    character_repo: Arc<dyn CharacterRepositoryPort>,
}

impl ListCharactersHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        character_repo: Arc<dyn CharacterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            character_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListCharacters,
    ) -> Result<Vec<CharacterRecord>, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self.character_repo.find_by_novel(query.novel_id).await?)
    }
}

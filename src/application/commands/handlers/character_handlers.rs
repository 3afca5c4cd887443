//! Character Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateCharacter, DeleteCharacter, UpdateCharacter};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CharacterChanges, CharacterRecord, CharacterRepositoryPort, NewCharacter, NovelRepositoryPort,
};
use crate::domain::novel::{require_text, CharacterRole};

/// 去掉空白特征词，保留顺序
fn clean_traits(traits: Vec<String>) -> Vec<String> {
    traits
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// CreateCharacter Handler
pub struct CreateCharacterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    character_repo: Arc<dyn CharacterRepositoryPort>,
}

impl CreateCharacterHandler {
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
        command: CreateCharacter,
    ) -> Result<CharacterRecord, ApplicationError> {
        let novel_id = command
            .novel_id
            .ok_or_else(|| ApplicationError::missing_field("novelId"))?;
        let name = command
            .name
            .ok_or_else(|| ApplicationError::missing_field("name"))?;
        let role = command
            .role
            .ok_or_else(|| ApplicationError::missing_field("role"))?;

        let new_character = NewCharacter {
            novel_id,
            name: require_text("name", name)?,
            role: CharacterRole::parse(&role)?,
            description: command.description,
            traits: clean_traits(command.traits.unwrap_or_default()),
        };

        self.novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        let character = self.character_repo.insert(&new_character).await?;

        tracing::info!(
            character_id = character.id,
            novel_id = novel_id,
            name = %character.name,
            "Character created"
        );

        Ok(character)
    }
}

/// UpdateCharacter Handler
pub struct UpdateCharacterHandler {
    character_repo: Arc<dyn CharacterRepositoryPort>,
}

impl UpdateCharacterHandler {
    pub fn new(character_repo: Arc<dyn CharacterRepositoryPort>) -> Self {
        Self { character_repo }
    }

    pub async fn handle(
        &self,
        command: UpdateCharacter,
    ) -> Result<CharacterRecord, ApplicationError> {
        let character_id = command.character_id;

        let changes = CharacterChanges {
            name: command.name.map(|n| require_text("name", n)).transpose()?,
            role: command
                .role
                .as_deref()
                .map(CharacterRole::parse)
                .transpose()?,
            description: command.description,
            traits: command.traits.map(clean_traits),
        };

        let character = self
            .character_repo
            .update(character_id, &changes)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Character", character_id))?;

        tracing::info!(character_id = character_id, "Character updated");

        Ok(character)
    }
}

/// DeleteCharacter Handler
pub struct DeleteCharacterHandler {
    character_repo: Arc<dyn CharacterRepositoryPort>,
}

impl DeleteCharacterHandler {
    pub fn new(character_repo: Arc<dyn CharacterRepositoryPort>) -> Self {
        Self { character_repo }
    }

    pub async fn handle(&self, command: DeleteCharacter) -> Result<(), ApplicationError> {
        let character_id = command.character_id;

        if !self.character_repo.delete(character_id).await? {
            return Err(ApplicationError::not_found("Character", character_id));
        }

        tracing::info!(character_id = character_id, "Character deleted");
        Ok(())
    }
}

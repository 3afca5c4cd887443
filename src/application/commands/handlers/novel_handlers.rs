//! Novel Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateNovel, DeleteNovel, UpdateNovel};
use crate::application::error::ApplicationError;
use crate::application::ports::{NewNovel, NovelChanges, NovelRecord, NovelRepositoryPort};
use crate::domain::novel::{
    require_text, validate_target_word_count, NovelStatus, Title, DEFAULT_TARGET_WORD_COUNT,
};

// ============================================================================
// CreateNovel
// ============================================================================

/// CreateNovel Handler
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<NovelRecord, ApplicationError> {
        let title = command
            .title
            .ok_or_else(|| ApplicationError::missing_field("title"))?;
        let genre = command
            .genre
            .ok_or_else(|| ApplicationError::missing_field("genre"))?;

        let new_novel = NewNovel {
            title: Title::new("title", title)?.into_inner(),
            genre: require_text("genre", genre)?,
            summary: command.summary,
            target_word_count: validate_target_word_count(
                command.target_word_count.unwrap_or(DEFAULT_TARGET_WORD_COUNT),
            )?,
            status: command
                .status
                .as_deref()
                .map(NovelStatus::parse)
                .transpose()?
                .unwrap_or_default(),
        };

        let novel = self.novel_repo.insert(&new_novel).await?;

        tracing::info!(
            novel_id = novel.id,
            title = %novel.title,
            genre = %novel.genre,
            "Novel created"
        );

        Ok(novel)
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler
pub struct UpdateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<NovelRecord, ApplicationError> {
        let novel_id = command.novel_id;

        let changes = NovelChanges {
            title: command
                .title
                .map(|t| Title::new("title", t).map(Title::into_inner))
                .transpose()?,
            genre: command
                .genre
                .map(|g| require_text("genre", g))
                .transpose()?,
            summary: command.summary,
            target_word_count: command
                .target_word_count
                .map(validate_target_word_count)
                .transpose()?,
            status: command
                .status
                .as_deref()
                .map(NovelStatus::parse)
                .transpose()?,
        };

        let novel = self
            .novel_repo
            .update(novel_id, &changes)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        tracing::info!(novel_id = novel_id, "Novel updated");

        Ok(novel)
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler
///
/// 章节、人物、场景在同一事务内一并删除
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl DeleteNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        let novel_id = command.novel_id;

        let deleted = self.novel_repo.delete(novel_id).await?;
        if !deleted {
            return Err(ApplicationError::not_found("Novel", novel_id));
        }

        tracing::info!(novel_id = novel_id, "Novel deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{test_pool, SqliteNovelRepository};

    async fn repo() -> Arc<dyn NovelRepositoryPort> {
        Arc::new(SqliteNovelRepository::new(test_pool().await))
    }

    #[tokio::test]
    async fn test_create_novel_applies_defaults() {
        let handler = CreateNovelHandler::new(repo().await);

        let novel = handler
            .handle(CreateNovel {
                title: Some("T".to_string()),
                genre: Some("Drama".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(novel.target_word_count, DEFAULT_TARGET_WORD_COUNT);
        assert_eq!(novel.status, NovelStatus::Planning);
        assert!(novel.summary.is_none());
    }

    #[tokio::test]
    async fn test_create_novel_missing_genre_reports_field() {
        let handler = CreateNovelHandler::new(repo().await);

        let err = handler
            .handle(CreateNovel {
                title: Some("T".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            ApplicationError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("genre")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_novel_rejects_unknown_status() {
        let handler = CreateNovelHandler::new(repo().await);

        let err = handler
            .handle(CreateNovel {
                title: Some("T".to_string()),
                genre: Some("Drama".to_string()),
                status: Some("abandoned".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_novel_is_not_found() {
        let handler = UpdateNovelHandler::new(repo().await);

        let err = handler
            .handle(UpdateNovel {
                novel_id: 999,
                title: Some("New".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound { id: 999, .. }));
    }

    #[tokio::test]
    async fn test_update_novel_partial() {
        let repo = repo().await;
        let created = CreateNovelHandler::new(repo.clone())
            .handle(CreateNovel {
                title: Some("T".to_string()),
                genre: Some("Drama".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = UpdateNovelHandler::new(repo)
            .handle(UpdateNovel {
                novel_id: created.id,
                status: Some("in_progress".to_string()),
                summary: Some("A journey".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "T");
        assert_eq!(updated.status, NovelStatus::InProgress);
        assert_eq!(updated.summary.as_deref(), Some("A journey"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_unknown_novel_is_not_found() {
        let handler = DeleteNovelHandler::new(repo().await);
        let err = handler.handle(DeleteNovel { novel_id: 5 }).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}

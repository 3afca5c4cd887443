//! Chapter Command Handlers
//!
//! 包含章节重排协议：校验提交的顺序是 [0, N) 的排列，
//! 然后在单个事务内核对当前章节集合并写入全部 order_index。

use std::sync::Arc;

use crate::application::commands::{CreateChapter, DeleteChapter, ReorderChapters, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, NewChapter, NovelRepositoryPort,
};
use crate::domain::novel::{validate_order_index, ChapterStatus, ReorderPlan, Title};

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
pub struct CreateChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let novel_id = command
            .novel_id
            .ok_or_else(|| ApplicationError::missing_field("novelId"))?;
        let title = command
            .title
            .ok_or_else(|| ApplicationError::missing_field("title"))?;

        let new_chapter = NewChapter {
            novel_id,
            title: Title::new("title", title)?.into_inner(),
            content: command.content,
            order_index: command.order_index.map(validate_order_index).transpose()?,
            status: command
                .status
                .as_deref()
                .map(ChapterStatus::parse)
                .transpose()?
                .unwrap_or_default(),
        };

        self.novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        let chapter = self.chapter_repo.insert(&new_chapter).await?;

        tracing::info!(
            chapter_id = chapter.id,
            novel_id = novel_id,
            order_index = chapter.order_index,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
///
/// 自动保存与手动保存都走这里；只写入请求中出现的字段
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let chapter_id = command.chapter_id;

        let changes = ChapterChanges {
            title: command
                .title
                .map(|t| Title::new("title", t).map(Title::into_inner))
                .transpose()?,
            content: command.content,
            order_index: command.order_index.map(validate_order_index).transpose()?,
            status: command
                .status
                .as_deref()
                .map(ChapterStatus::parse)
                .transpose()?,
        };

        let chapter = self
            .chapter_repo
            .update(chapter_id, &changes)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        tracing::debug!(chapter_id = chapter_id, "Chapter updated");

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
///
/// 后续章节的 order_index 在同一事务内前移，保持 [0, N) 连续
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let chapter_id = command.chapter_id;

        if !self.chapter_repo.delete(chapter_id).await? {
            return Err(ApplicationError::not_found("Chapter", chapter_id));
        }

        tracing::info!(chapter_id = chapter_id, "Chapter deleted");

        Ok(())
    }
}

// ============================================================================
// ReorderChapters
// ============================================================================

/// ReorderChapters Handler
///
/// 并发重排没有版本检查，后写入者生效
pub struct ReorderChaptersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ReorderChaptersHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: ReorderChapters) -> Result<(), ApplicationError> {
        let novel_id = command.novel_id;

        self.novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        let plan = ReorderPlan::from_orders(command.orders)?;

        // 与当前章节集合的比对在写入事务内完成
        self.chapter_repo.reorder(novel_id, &plan).await?;

        tracing::info!(
            novel_id = novel_id,
            chapters = plan.len(),
            "Chapters reordered"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{NewNovel, NovelRecord};
    use crate::domain::novel::{ChapterOrder, NovelStatus};
    use crate::infrastructure::persistence::sqlite::{
        test_pool, SqliteChapterRepository, SqliteNovelRepository,
    };

    struct Fixture {
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        novel: NovelRecord,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let novel_repo: Arc<dyn NovelRepositoryPort> =
            Arc::new(SqliteNovelRepository::new(pool.clone()));
        let chapter_repo: Arc<dyn ChapterRepositoryPort> =
            Arc::new(SqliteChapterRepository::new(pool));
        let novel = novel_repo
            .insert(&NewNovel {
                title: "T".to_string(),
                genre: "Drama".to_string(),
                summary: None,
                target_word_count: 50_000,
                status: NovelStatus::Planning,
            })
            .await
            .unwrap();
        Fixture {
            novel_repo,
            chapter_repo,
            novel,
        }
    }

    async fn create(fx: &Fixture, title: &str) -> ChapterRecord {
        CreateChapterHandler::new(fx.novel_repo.clone(), fx.chapter_repo.clone())
            .handle(CreateChapter {
                novel_id: Some(fx.novel.id),
                title: Some(title.to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_appends_at_sibling_count() {
        let fx = fixture().await;
        let first = create(&fx, "Ch1").await;
        let second = create(&fx, "Ch2").await;

        assert_eq!(first.order_index, 0);
        assert_eq!(second.order_index, 1);
        assert_eq!(second.status, ChapterStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_for_unknown_novel_is_not_found() {
        let fx = fixture().await;
        let err = CreateChapterHandler::new(fx.novel_repo.clone(), fx.chapter_repo.clone())
            .handle(CreateChapter {
                novel_id: Some(fx.novel.id + 100),
                title: Some("Orphan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Novel", .. }));
    }

    #[tokio::test]
    async fn test_reorder_applies_permutation() {
        let fx = fixture().await;
        let a = create(&fx, "A").await;
        let b = create(&fx, "B").await;
        let c = create(&fx, "C").await;

        let handler = ReorderChaptersHandler::new(fx.novel_repo.clone(), fx.chapter_repo.clone());
        let plan = ReorderPlan::from_ordered_ids(&[c.id, a.id, b.id]).unwrap();
        handler
            .handle(ReorderChapters {
                novel_id: fx.novel.id,
                orders: plan.orders().to_vec(),
            })
            .await
            .unwrap();

        let chapters = fx.chapter_repo.find_by_novel(fx.novel.id).await.unwrap();
        let titles: Vec<&str> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        for (position, chapter) in chapters.iter().enumerate() {
            assert_eq!(chapter.order_index, position as i64);
        }
    }

    #[tokio::test]
    async fn test_reorder_rejects_partial_list() {
        let fx = fixture().await;
        let a = create(&fx, "A").await;
        let b = create(&fx, "B").await;

        let handler = ReorderChaptersHandler::new(fx.novel_repo.clone(), fx.chapter_repo.clone());
        let err = handler
            .handle(ReorderChapters {
                novel_id: fx.novel.id,
                orders: vec![ChapterOrder::new(b.id, 0)],
            })
            .await
            .unwrap_err();

        match err {
            ApplicationError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("orders")),
            other => panic!("unexpected error: {:?}", other),
        }

        // 原顺序不变
        let chapters = fx.chapter_repo.find_by_novel(fx.novel.id).await.unwrap();
        assert_eq!(chapters[0].id, a.id);
        assert_eq!(chapters[1].id, b.id);
    }

    #[tokio::test]
    async fn test_reorder_unknown_novel_is_not_found() {
        let fx = fixture().await;
        let handler = ReorderChaptersHandler::new(fx.novel_repo.clone(), fx.chapter_repo.clone());
        let err = handler
            .handle(ReorderChapters {
                novel_id: 12345,
                orders: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_compacts_order() {
        let fx = fixture().await;
        let a = create(&fx, "A").await;
        let b = create(&fx, "B").await;
        let c = create(&fx, "C").await;

        DeleteChapterHandler::new(fx.chapter_repo.clone())
            .handle(DeleteChapter { chapter_id: b.id })
            .await
            .unwrap();

        let chapters = fx.chapter_repo.find_by_novel(fx.novel.id).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!((chapters[0].id, chapters[0].order_index), (a.id, 0));
        assert_eq!((chapters[1].id, chapters[1].order_index), (c.id, 1));
    }

    #[tokio::test]
    async fn test_update_chapter_rejects_empty_title() {
        let fx = fixture().await;
        let a = create(&fx, "A").await;

        let err = UpdateChapterHandler::new(fx.chapter_repo.clone())
            .handle(UpdateChapter {
                chapter_id: a.id,
                title: Some("  ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Validation { .. }));
    }
}

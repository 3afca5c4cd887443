//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort, NovelRepositoryPort};
use crate::application::queries::{GetChapter, ListChapters};

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterRecord, ApplicationError> {
        self.chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<Vec<ChapterRecord>, ApplicationError> {
        // 验证小说存在
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self.chapter_repo.find_by_novel(query.novel_id).await?)
    }
}

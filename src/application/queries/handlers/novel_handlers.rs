//! Novel Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRecord, NovelRepositoryPort};
use crate::application::queries::{GetNovel, ListNovels};

/// GetNovel Handler
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelRecord, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))
    }
}

/// ListNovels Handler
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, _query: ListNovels) -> Result<Vec<NovelRecord>, ApplicationError> {
        Ok(self.novel_repo.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NewNovel;
    use crate::domain::novel::NovelStatus;
    use crate::infrastructure::persistence::sqlite::{test_pool, SqliteNovelRepository};

    #[tokio::test]
    async fn test_list_novels_sorted_by_title() {
        let repo: Arc<dyn NovelRepositoryPort> =
            Arc::new(SqliteNovelRepository::new(test_pool().await));
        for title in ["Zephyr", "Amber", "Moss"] {
            repo.insert(&NewNovel {
                title: title.to_string(),
                genre: "Drama".to_string(),
                summary: None,
                target_word_count: 50_000,
                status: NovelStatus::Planning,
            })
            .await
            .unwrap();
        }

        let novels = ListNovelsHandler::new(repo).handle(ListNovels).await.unwrap();
        let titles: Vec<&str> = novels.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Amber", "Moss", "Zephyr"]);
    }

    #[tokio::test]
    async fn test_get_missing_novel() {
        let repo: Arc<dyn NovelRepositoryPort> =
            Arc::new(SqliteNovelRepository::new(test_pool().await));
        let err = GetNovelHandler::new(repo)
            .handle(GetNovel { novel_id: 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Novel", id: 1 }));
    }
}

//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::novel::{ChapterStatus, CharacterRole, NovelError, NovelStatus, ReorderPlan};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 写入时才能发现的领域规则冲突（如重排列表与当前章节集合不符）
    #[error(transparent)]
    Domain(#[from] NovelError),
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct NovelRecord {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub summary: Option<String>,
    pub target_word_count: i64,
    pub status: NovelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待插入的小说
#[derive(Debug, Clone)]
pub struct NewNovel {
    pub title: String,
    pub genre: String,
    pub summary: Option<String>,
    pub target_word_count: i64,
    pub status: NovelStatus,
}

/// 小说的部分更新，`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct NovelChanges {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub summary: Option<String>,
    pub target_word_count: Option<i64>,
    pub status: Option<NovelStatus>,
}

impl NovelRecord {
    /// 应用部分更新并刷新 updated_at
    pub fn apply(&mut self, changes: &NovelChanges, now: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(genre) = &changes.genre {
            self.genre = genre.clone();
        }
        if let Some(summary) = &changes.summary {
            self.summary = Some(summary.clone());
        }
        if let Some(count) = changes.target_word_count {
            self.target_word_count = count;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 插入小说，返回带 ID 的记录
    async fn insert(&self, novel: &NewNovel) -> Result<NovelRecord, RepositoryError>;

    /// 根据 ID 查找小说
    async fn find_by_id(&self, id: i64) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 获取所有小说（按标题排序）
    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError>;

    /// 部分更新，小说不存在时返回 None
    async fn update(
        &self,
        id: i64,
        changes: &NovelChanges,
    ) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 删除小说及其全部章节、人物、场景（单个事务）
    ///
    /// 返回是否删除了记录
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRecord {
    pub id: i64,
    pub novel_id: i64,
    pub title: String,
    /// 富文本 HTML
    pub content: Option<String>,
    pub order_index: i64,
    pub status: ChapterStatus,
    pub created_at: DateTime<Utc>,
}

/// 待插入的章节
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub novel_id: i64,
    pub title: String,
    pub content: Option<String>,
    /// 为 None 时追加到末尾（当前章节数）；
    /// 指定时截断到 [0, 章节数]，原位置及之后的章节后移一位
    pub order_index: Option<i64>,
    pub status: ChapterStatus,
}

/// 章节的部分更新
///
/// order_index 为目标位置：超出范围时截断到末尾，其间的兄弟章节顺移
#[derive(Debug, Clone, Default)]
pub struct ChapterChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub order_index: Option<i64>,
    pub status: Option<ChapterStatus>,
}

impl ChapterRecord {
    pub fn apply(&mut self, changes: &ChapterChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = Some(content.clone());
        }
        if let Some(index) = changes.order_index {
            self.order_index = index;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    async fn insert(&self, chapter: &NewChapter) -> Result<ChapterRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 获取小说的全部章节（按 order_index 升序）
    async fn find_by_novel(&self, novel_id: i64) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 部分更新；移动位置时同一事务内顺移其间的兄弟章节
    async fn update(
        &self,
        id: i64,
        changes: &ChapterChanges,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 删除章节，并在同一事务内压缩后续章节的 order_index
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// 原子地应用重排计划
    ///
    /// 在同一事务内读取当前章节集合并校验计划覆盖全部章节，
    /// 不符时返回 `RepositoryError::Domain`，不写入任何更新
    async fn reorder(&self, novel_id: i64, plan: &ReorderPlan) -> Result<(), RepositoryError>;
}

// ============================================================================
// Character Repository
// ============================================================================

/// 人物实体（用于持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub id: i64,
    pub novel_id: i64,
    pub name: String,
    pub role: CharacterRole,
    pub description: Option<String>,
    pub traits: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub novel_id: i64,
    pub name: String,
    pub role: CharacterRole,
    pub description: Option<String>,
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CharacterChanges {
    pub name: Option<String>,
    pub role: Option<CharacterRole>,
    pub description: Option<String>,
    pub traits: Option<Vec<String>>,
}

impl CharacterRecord {
    pub fn apply(&mut self, changes: &CharacterChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(traits) = &changes.traits {
            self.traits = traits.clone();
        }
    }
}

/// Character Repository Port
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    async fn insert(&self, character: &NewCharacter) -> Result<CharacterRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CharacterRecord>, RepositoryError>;

    async fn find_by_novel(&self, novel_id: i64)
        -> Result<Vec<CharacterRecord>, RepositoryError>;

    async fn update(
        &self,
        id: i64,
        changes: &CharacterChanges,
    ) -> Result<Option<CharacterRecord>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Setting Repository
// ============================================================================

/// 场景实体（用于持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct SettingRecord {
    pub id: i64,
    pub novel_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSetting {
    pub novel_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SettingRecord {
    pub fn apply(&mut self, changes: &SettingChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
    }
}

/// Setting Repository Port
#[async_trait]
pub trait SettingRepositoryPort: Send + Sync {
    async fn insert(&self, setting: &NewSetting) -> Result<SettingRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<SettingRecord>, RepositoryError>;

    async fn find_by_novel(&self, novel_id: i64) -> Result<Vec<SettingRecord>, RepositoryError>;

    async fn update(
        &self,
        id: i64,
        changes: &SettingChanges,
    ) -> Result<Option<SettingRecord>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_novel_apply_only_touches_provided_fields() {
        let created = Utc::now() - Duration::hours(1);
        let mut novel = NovelRecord {
            id: 1,
            title: "Old".to_string(),
            genre: "Drama".to_string(),
            summary: None,
            target_word_count: 50_000,
            status: NovelStatus::Planning,
            created_at: created,
            updated_at: created,
        };
        let now = Utc::now();

        novel.apply(
            &NovelChanges {
                status: Some(NovelStatus::InProgress),
                ..Default::default()
            },
            now,
        );

        assert_eq!(novel.title, "Old");
        assert_eq!(novel.status, NovelStatus::InProgress);
        assert_eq!(novel.created_at, created);
        assert_eq!(novel.updated_at, now);
    }

    #[test]
    fn test_chapter_apply_sets_content() {
        let mut chapter = ChapterRecord {
            id: 3,
            novel_id: 1,
            title: "Ch".to_string(),
            content: None,
            order_index: 0,
            status: ChapterStatus::Draft,
            created_at: Utc::now(),
        };

        chapter.apply(&ChapterChanges {
            content: Some("<p>Hello</p>".to_string()),
            ..Default::default()
        });

        assert_eq!(chapter.content.as_deref(), Some("<p>Hello</p>"));
        assert_eq!(chapter.title, "Ch");
    }
}

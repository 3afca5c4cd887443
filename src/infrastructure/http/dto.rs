//! Data Transfer Objects
//!
//! JSON 字段统一为 camelCase。实体 DTO 同时实现 Deserialize，
//! 供 REST 客户端复用同一套线上格式。

use serde::{Deserialize, Serialize};

use crate::application::commands::{
    CreateChapter, CreateCharacter, CreateNovel, CreateSetting, GenerateChapterContent,
    GeneratePlot, ReorderChapters, UpdateChapter, UpdateCharacter, UpdateNovel, UpdateSetting,
};
use crate::application::ports::{ChapterRecord, CharacterRecord, NovelRecord, SettingRecord};
use crate::domain::novel::{ChapterOrder, ChapterStatus, CharacterRole, NovelStatus};

// ============================================================================
// Entity DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDto {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub summary: Option<String>,
    pub target_word_count: i64,
    pub status: NovelStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NovelRecord> for NovelDto {
    fn from(record: NovelRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            genre: record.genre,
            summary: record.summary,
            target_word_count: record.target_word_count,
            status: record.status,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    pub id: i64,
    pub novel_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub order_index: i64,
    pub status: ChapterStatus,
    pub created_at: String,
}

impl From<ChapterRecord> for ChapterDto {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            title: record.title,
            content: record.content,
            order_index: record.order_index,
            status: record.status,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDto {
    pub id: i64,
    pub novel_id: i64,
    pub name: String,
    pub role: CharacterRole,
    pub description: Option<String>,
    pub traits: Vec<String>,
    pub created_at: String,
}

impl From<CharacterRecord> for CharacterDto {
    fn from(record: CharacterRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            name: record.name,
            role: record.role,
            description: record.description,
            traits: record.traits,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
    pub id: i64,
    pub novel_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<SettingRecord> for SettingDto {
    fn from(record: SettingRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            name: record.name,
            description: record.description,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Novel Requests
// ============================================================================

/// 必填字段也声明为 Option，缺失时由 handler 给出字段级错误
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNovelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<CreateNovelRequest> for CreateNovel {
    fn from(req: CreateNovelRequest) -> Self {
        Self {
            title: req.title,
            genre: req.genre,
            summary: req.summary,
            target_word_count: req.target_word_count,
            status: req.status,
        }
    }
}

/// 部分更新：省略的字段保持原值
pub type UpdateNovelRequest = CreateNovelRequest;

impl CreateNovelRequest {
    pub fn into_update(self, novel_id: i64) -> UpdateNovel {
        UpdateNovel {
            novel_id,
            title: self.title,
            genre: self.genre,
            summary: self.summary,
            target_word_count: self.target_word_count,
            status: self.status,
        }
    }
}

// ============================================================================
// Chapter Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRequest {
    /// 仅 POST /chapters 使用；嵌套路由以路径中的小说 ID 为准
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ChapterRequest {
    pub fn into_create(self, novel_id: Option<i64>) -> CreateChapter {
        CreateChapter {
            novel_id: novel_id.or(self.novel_id),
            title: self.title,
            content: self.content,
            order_index: self.order_index,
            status: self.status,
        }
    }

    /// 章节不能通过更新换到另一部小说，novelId 被忽略
    pub fn into_update(self, chapter_id: i64) -> UpdateChapter {
        UpdateChapter {
            chapter_id,
            title: self.title,
            content: self.content,
            order_index: self.order_index,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOrderDto {
    pub id: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderChaptersRequest {
    pub orders: Vec<ChapterOrderDto>,
}

impl ReorderChaptersRequest {
    pub fn into_command(self, novel_id: i64) -> ReorderChapters {
        ReorderChapters {
            novel_id,
            orders: self
                .orders
                .into_iter()
                .map(|o| ChapterOrder::new(o.id, o.order_index))
                .collect(),
        }
    }
}

// ============================================================================
// Character Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<String>>,
}

impl CharacterRequest {
    pub fn into_create(self, novel_id: Option<i64>) -> CreateCharacter {
        CreateCharacter {
            novel_id: novel_id.or(self.novel_id),
            name: self.name,
            role: self.role,
            description: self.description,
            traits: self.traits,
        }
    }

    pub fn into_update(self, character_id: i64) -> UpdateCharacter {
        UpdateCharacter {
            character_id,
            name: self.name,
            role: self.role,
            description: self.description,
            traits: self.traits,
        }
    }
}

// ============================================================================
// Setting Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SettingRequest {
    pub fn into_create(self, novel_id: Option<i64>) -> CreateSetting {
        CreateSetting {
            novel_id: novel_id.or(self.novel_id),
            name: self.name,
            description: self.description,
        }
    }

    pub fn into_update(self, setting_id: i64) -> UpdateSetting {
        UpdateSetting {
            setting_id,
            name: self.name,
            description: self.description,
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratePlotRequest {
    pub genre: Option<String>,
    pub theme: Option<String>,
}

impl From<GeneratePlotRequest> for GeneratePlot {
    fn from(req: GeneratePlotRequest) -> Self {
        Self {
            genre: req.genre,
            theme: req.theme,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentRequest {
    pub prompt: Option<String>,
}

impl GenerateContentRequest {
    pub fn into_command(self, chapter_id: i64) -> GenerateChapterContent {
        GenerateChapterContent {
            chapter_id,
            prompt: self.prompt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContentResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_chapter_dto_is_camel_case() {
        let dto = ChapterDto::from(ChapterRecord {
            id: 4,
            novel_id: 1,
            title: "Ch1".to_string(),
            content: None,
            order_index: 2,
            status: ChapterStatus::Final,
            created_at: Utc::now(),
        });

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["novelId"], 1);
        assert_eq!(value["orderIndex"], 2);
        assert_eq!(value["status"], "final");
        assert!(value["content"].is_null());
    }

    #[test]
    fn test_nested_route_novel_id_wins() {
        let req: ChapterRequest =
            serde_json::from_value(json!({"novelId": 9, "title": "Ch"})).unwrap();
        assert_eq!(req.into_create(Some(3)).novel_id, Some(3));
    }

    #[test]
    fn test_reorder_request_maps_orders() {
        let req: ReorderChaptersRequest = serde_json::from_value(json!({
            "orders": [{"id": 7, "orderIndex": 1}, {"id": 8, "orderIndex": 0}]
        }))
        .unwrap();

        let command = req.into_command(1);
        assert_eq!(command.orders[0], ChapterOrder::new(7, 1));
        assert_eq!(command.orders[1], ChapterOrder::new(8, 0));
    }

    #[test]
    fn test_partial_request_omits_missing_fields() {
        let req = ChapterRequest {
            content: Some("<p>x</p>".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"content": "<p>x</p>"})
        );
    }
}

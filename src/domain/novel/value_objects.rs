//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};

use super::NovelError;

/// 默认目标字数
pub const DEFAULT_TARGET_WORD_COUNT: i64 = 50_000;

const MAX_TITLE_CHARS: usize = 200;

/// 小说 / 章节标题
///
/// 不变量: 去除首尾空白后非空，且不超过 200 字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(field: &'static str, title: impl Into<String>) -> Result<Self, NovelError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(NovelError::invalid_field(field, "Title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_CHARS {
            return Err(NovelError::invalid_field(
                field,
                format!("Title cannot exceed {} characters", MAX_TITLE_CHARS),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 必填文本字段（类型、人物名称、场景名称等）
pub fn require_text(field: &'static str, value: impl Into<String>) -> Result<String, NovelError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NovelError::invalid_field(
            field,
            format!("{} cannot be empty", field),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_target_word_count(count: i64) -> Result<i64, NovelError> {
    if count <= 0 {
        return Err(NovelError::invalid_field(
            "targetWordCount",
            "Target word count must be positive",
        ));
    }
    Ok(count)
}

pub fn validate_order_index(index: i64) -> Result<i64, NovelError> {
    if index < 0 {
        return Err(NovelError::invalid_field(
            "orderIndex",
            "Order index cannot be negative",
        ));
    }
    Ok(index)
}

/// 小说写作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovelStatus {
    /// 构思中
    Planning,
    /// 写作中
    InProgress,
    /// 已完成
    Completed,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Planning => "planning",
            NovelStatus::InProgress => "in_progress",
            NovelStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planning" => Some(NovelStatus::Planning),
            "in_progress" => Some(NovelStatus::InProgress),
            "completed" => Some(NovelStatus::Completed),
            _ => None,
        }
    }

    /// 解析请求中的状态字段
    pub fn parse(s: &str) -> Result<Self, NovelError> {
        Self::from_str(s).ok_or_else(|| {
            NovelError::invalid_field(
                "status",
                format!(
                    "Unknown novel status '{}', expected planning, in_progress or completed",
                    s
                ),
            )
        })
    }
}

impl Default for NovelStatus {
    fn default() -> Self {
        NovelStatus::Planning
    }
}

/// 章节状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    /// 草稿
    Draft,
    /// 定稿
    Final,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "draft",
            ChapterStatus::Final => "final",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ChapterStatus::Draft),
            "final" => Some(ChapterStatus::Final),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, NovelError> {
        Self::from_str(s).ok_or_else(|| {
            NovelError::invalid_field(
                "status",
                format!("Unknown chapter status '{}', expected draft or final", s),
            )
        })
    }
}

impl Default for ChapterStatus {
    fn default() -> Self {
        ChapterStatus::Draft
    }
}

/// 人物在故事中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterRole {
    Protagonist,
    Antagonist,
    Supporting,
}

impl CharacterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterRole::Protagonist => "Protagonist",
            CharacterRole::Antagonist => "Antagonist",
            CharacterRole::Supporting => "Supporting",
        }
    }

    /// 大小写不敏感
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protagonist" => Some(CharacterRole::Protagonist),
            "antagonist" => Some(CharacterRole::Antagonist),
            "supporting" => Some(CharacterRole::Supporting),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, NovelError> {
        Self::from_str(s).ok_or_else(|| {
            NovelError::invalid_field(
                "role",
                format!(
                    "Unknown character role '{}', expected Protagonist, Antagonist or Supporting",
                    s
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        let title = Title::new("title", "  The Long Road ").unwrap();
        assert_eq!(title.as_str(), "The Long Road");
    }

    #[test]
    fn test_empty_title_reports_field() {
        let err = Title::new("title", "   ").unwrap_err();
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn test_title_length_counts_chars() {
        // 200 个多字节字符仍然合法
        let title: String = std::iter::repeat('ع').take(200).collect();
        assert!(Title::new("title", title).is_ok());

        let too_long: String = std::iter::repeat('a').take(201).collect();
        assert!(Title::new("title", too_long).is_err());
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(NovelStatus::parse("in_progress").unwrap(), NovelStatus::InProgress);
        assert_eq!(NovelStatus::default(), NovelStatus::Planning);
        assert_eq!(ChapterStatus::parse("final").unwrap(), ChapterStatus::Final);
        assert_eq!(NovelStatus::parse("done").unwrap_err().field(), "status");
    }

    #[test]
    fn test_character_role_is_case_insensitive() {
        assert_eq!(
            CharacterRole::parse("antagonist").unwrap(),
            CharacterRole::Antagonist
        );
        assert_eq!(CharacterRole::parse("Villain").unwrap_err().field(), "role");
    }

    #[test]
    fn test_numeric_validation() {
        assert!(validate_target_word_count(0).is_err());
        assert_eq!(validate_target_word_count(80_000).unwrap(), 80_000);
        assert!(validate_order_index(-1).is_err());
        assert_eq!(validate_order_index(0).unwrap(), 0);
    }
}

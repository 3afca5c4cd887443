//! Generation Command Handlers - AI 辅助生成
//!
//! 生成器以端口注入，失败统一映射为 ApplicationError::Generation。
//! 章节正文只在生成成功后写入。

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::commands::{GenerateChapterContent, GeneratePlot};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, CharacterRecord,
    CharacterRepositoryPort, GenerationRequest, NovelRepositoryPort, TextGeneratorPort,
};
use crate::domain::novel::{require_text, ChapterStatus};
use crate::domain::{excerpt, strip_html};

/// 上下文中最多引用的前序章节数
const CONTEXT_CHAPTERS: usize = 2;
/// 每个前序章节摘录的字符数
const CONTEXT_EXCERPT_CHARS: usize = 500;

const DEFAULT_CHAPTER_INSTRUCTIONS: &str =
    "Write a long, detailed, and engaging chapter based on the plot.";

// ============================================================================
// GeneratePlot
// ============================================================================

/// 大纲中的人物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotCharacter {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
}

/// 故事大纲（模型按此结构返回 JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotOutline {
    pub plot: String,
    pub suggested_title: String,
    #[serde(default)]
    pub characters: Vec<PlotCharacter>,
}

/// GeneratePlot Handler
pub struct GeneratePlotHandler {
    generator: Arc<dyn TextGeneratorPort>,
    language: String,
}

impl GeneratePlotHandler {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, language: impl Into<String>) -> Self {
        Self {
            generator,
            language: language.into(),
        }
    }

    pub async fn handle(&self, command: GeneratePlot) -> Result<PlotOutline, ApplicationError> {
        let genre = command
            .genre
            .ok_or_else(|| ApplicationError::missing_field("genre"))?;
        let genre = require_text("genre", genre)?;
        let theme = command
            .theme
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let prompt = plot_prompt(&genre, theme.as_deref(), &self.language);
        let raw = self.generator.generate(GenerationRequest::json(prompt)).await?;

        let outline: PlotOutline = serde_json::from_str(raw.trim()).map_err(|e| {
            tracing::warn!(error = %e, "Plot outline response is not valid JSON");
            ApplicationError::Generation(format!("Malformed plot outline: {}", e))
        })?;

        tracing::info!(
            genre = %genre,
            suggested_title = %outline.suggested_title,
            characters = outline.characters.len(),
            "Plot outline generated"
        );

        Ok(outline)
    }
}

fn plot_prompt(genre: &str, theme: Option<&str>, language: &str) -> String {
    format!(
        "Generate a creative novel plot outline in {language}.\n\
         Genre: {genre}\n\
         Theme: {theme}\n\
         \n\
         Output a JSON object with fields:\n\
         - plot: a detailed summary (3-4 paragraphs)\n\
         - suggestedTitle: a catchy title\n\
         - characters: an array of 3 main characters {{ name, role, description }}\n\
         \n\
         Keep the content clean and suitable for a general audience.",
        language = language,
        genre = genre,
        theme = theme.unwrap_or("General"),
    )
}

// ============================================================================
// GenerateChapterContent
// ============================================================================

/// 章节正文生成结果
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub chapter_id: i64,
    pub content: String,
}

/// GenerateChapterContent Handler
pub struct GenerateChapterContentHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    character_repo: Arc<dyn CharacterRepositoryPort>,
    generator: Arc<dyn TextGeneratorPort>,
    language: String,
}

impl GenerateChapterContentHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        character_repo: Arc<dyn CharacterRepositoryPort>,
        generator: Arc<dyn TextGeneratorPort>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            character_repo,
            generator,
            language: language.into(),
        }
    }

    pub async fn handle(
        &self,
        command: GenerateChapterContent,
    ) -> Result<GeneratedContent, ApplicationError> {
        let chapter_id = command.chapter_id;

        let chapter = self
            .chapter_repo
            .find_by_id(chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;
        let novel = self
            .novel_repo
            .find_by_id(chapter.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", chapter.novel_id))?;
        let characters = self.character_repo.find_by_novel(chapter.novel_id).await?;
        let siblings = self.chapter_repo.find_by_novel(chapter.novel_id).await?;

        let prompt = chapter_prompt(ChapterPromptContext {
            novel_title: &novel.title,
            chapter: &chapter,
            characters: &characters,
            previous: &previous_chapters_context(&siblings, chapter.order_index),
            instructions: command.prompt.as_deref(),
            language: &self.language,
        });

        tracing::debug!(
            chapter_id = chapter_id,
            prompt_len = prompt.len(),
            "Requesting chapter content"
        );

        let content = self.generator.generate(GenerationRequest::text(prompt)).await?;

        let changes = ChapterChanges {
            content: Some(content.clone()),
            status: Some(ChapterStatus::Draft),
            ..Default::default()
        };
        self.chapter_repo
            .update(chapter_id, &changes)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        tracing::info!(
            chapter_id = chapter_id,
            novel_id = novel.id,
            content_len = content.len(),
            "Chapter content generated"
        );

        Ok(GeneratedContent {
            chapter_id,
            content,
        })
    }
}

struct ChapterPromptContext<'a> {
    novel_title: &'a str,
    chapter: &'a ChapterRecord,
    characters: &'a [CharacterRecord],
    previous: &'a str,
    instructions: Option<&'a str>,
    language: &'a str,
}

/// 取当前章节之前、已有正文的最后两章，去标签后截断
fn previous_chapters_context(siblings: &[ChapterRecord], before_index: i64) -> String {
    let earlier: Vec<&ChapterRecord> = siblings
        .iter()
        .filter(|c| c.order_index < before_index)
        .filter(|c| c.content.as_deref().is_some_and(|s| !s.is_empty()))
        .collect();
    let skip = earlier.len().saturating_sub(CONTEXT_CHAPTERS);

    earlier[skip..]
        .iter()
        .map(|c| {
            let text = strip_html(c.content.as_deref().unwrap_or_default());
            format!(
                "Chapter {}: {}\n{}...",
                c.order_index + 1,
                c.title,
                excerpt(&text, CONTEXT_EXCERPT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn chapter_prompt(ctx: ChapterPromptContext<'_>) -> String {
    let roster = ctx
        .characters
        .iter()
        .map(|c| {
            format!(
                "- {} ({}): {}",
                c.name,
                c.role.as_str(),
                c.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let instructions = ctx
        .instructions
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CHAPTER_INSTRUCTIONS);

    format!(
        "Write a full novel chapter in {language}.\n\
         Novel Title: {novel}\n\
         Chapter Title: {chapter}\n\
         Characters:\n{roster}\n\
         Context from previous chapters:\n{previous}\n\
         User Instructions: {instructions}\n\
         \n\
         Requirements:\n\
         - Style: descriptive, literary, and professional.\n\
         - Clean content suitable for a general audience.\n\
         - Length: at least 1000 words.\n\
         - Output format: HTML (paragraphs and dialogues).",
        language = ctx.language,
        novel = ctx.novel_title,
        chapter = ctx.chapter.title,
        roster = roster,
        previous = ctx.previous,
        instructions = instructions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        GenerationError, NewChapter, NewCharacter, NewNovel, ResponseFormat,
    };
    use crate::domain::novel::{CharacterRole, NovelStatus};
    use crate::infrastructure::persistence::sqlite::{
        test_pool, SqliteChapterRepository, SqliteCharacterRepository, SqliteNovelRepository,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// 按顺序返回预设结果，并记录收到的请求
    struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, GenerationError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGeneratorPort for ScriptedGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(GenerationError::ServiceError("no response".into())))
        }
    }

    fn chapter(order_index: i64, title: &str, content: Option<&str>) -> ChapterRecord {
        ChapterRecord {
            id: order_index + 1,
            novel_id: 1,
            title: title.to_string(),
            content: content.map(str::to_string),
            order_index,
            status: ChapterStatus::Draft,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_previous_context_uses_last_two_chapters_with_content() {
        let siblings = vec![
            chapter(0, "Dawn", Some("<p>First</p>")),
            chapter(1, "Empty", None),
            chapter(2, "Noon", Some("<p>Second</p>")),
            chapter(3, "Dusk", Some("<p>Third</p>")),
            chapter(4, "Current", Some("<p>Now</p>")),
        ];

        let context = previous_chapters_context(&siblings, 4);

        assert_eq!(context, "Chapter 3: Noon\nSecond...\n\nChapter 4: Dusk\nThird...");
    }

    #[test]
    fn test_previous_context_truncates_long_chapters() {
        let long = format!("<p>{}</p>", "x".repeat(900));
        let siblings = vec![chapter(0, "Long", Some(&long))];

        let context = previous_chapters_context(&siblings, 1);

        assert_eq!(context.matches('x').count(), CONTEXT_EXCERPT_CHARS);
    }

    #[test]
    fn test_plot_prompt_defaults_theme() {
        let prompt = plot_prompt("Drama", None, "Arabic");
        assert!(prompt.contains("in Arabic"));
        assert!(prompt.contains("Genre: Drama"));
        assert!(prompt.contains("Theme: General"));
    }

    #[tokio::test]
    async fn test_generate_plot_parses_outline() {
        let generator = ScriptedGenerator::new(vec![Ok(r#"{
            "plot": "A young man leaves his village.",
            "suggestedTitle": "The Road Out",
            "characters": [{"name": "Ahmad", "role": "Protagonist", "description": "Dreamer"}]
        }"#
        .to_string())]);
        let handler = GeneratePlotHandler::new(generator.clone(), "English");

        let outline = handler
            .handle(GeneratePlot {
                genre: Some("Drama".to_string()),
                theme: Some("identity".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(outline.suggested_title, "The Road Out");
        assert_eq!(outline.characters[0].name, "Ahmad");
        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests[0].format, ResponseFormat::JsonObject);
        assert!(requests[0].prompt.contains("Theme: identity"));
    }

    #[tokio::test]
    async fn test_generate_plot_malformed_json_is_generation_error() {
        let generator = ScriptedGenerator::new(vec![Ok("not json".to_string())]);
        let handler = GeneratePlotHandler::new(generator, "English");

        let err = handler
            .handle(GeneratePlot {
                genre: Some("Drama".to_string()),
                theme: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Generation(_)));
    }

    #[tokio::test]
    async fn test_generate_plot_requires_genre() {
        let handler = GeneratePlotHandler::new(ScriptedGenerator::new(vec![]), "English");
        let err = handler.handle(GeneratePlot::default()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation { .. }));
    }

    struct ContentFixture {
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        handler_parts: (
            Arc<dyn NovelRepositoryPort>,
            Arc<dyn CharacterRepositoryPort>,
        ),
        target: ChapterRecord,
    }

    async fn content_fixture() -> ContentFixture {
        let pool = test_pool().await;
        let novel_repo: Arc<dyn NovelRepositoryPort> =
            Arc::new(SqliteNovelRepository::new(pool.clone()));
        let chapter_repo: Arc<dyn ChapterRepositoryPort> =
            Arc::new(SqliteChapterRepository::new(pool.clone()));
        let character_repo: Arc<dyn CharacterRepositoryPort> =
            Arc::new(SqliteCharacterRepository::new(pool));

        let novel = novel_repo
            .insert(&NewNovel {
                title: "The Road Out".to_string(),
                genre: "Drama".to_string(),
                summary: None,
                target_word_count: 50_000,
                status: NovelStatus::Planning,
            })
            .await
            .unwrap();
        character_repo
            .insert(&NewCharacter {
                novel_id: novel.id,
                name: "Ahmad".to_string(),
                role: CharacterRole::Protagonist,
                description: Some("Dreamer".to_string()),
                traits: vec![],
            })
            .await
            .unwrap();
        chapter_repo
            .insert(&NewChapter {
                novel_id: novel.id,
                title: "Farewell".to_string(),
                content: Some("<p>The sun set.</p>".to_string()),
                order_index: None,
                status: ChapterStatus::Final,
            })
            .await
            .unwrap();
        let target = chapter_repo
            .insert(&NewChapter {
                novel_id: novel.id,
                title: "The City".to_string(),
                content: Some("<p>old draft</p>".to_string()),
                order_index: None,
                status: ChapterStatus::Final,
            })
            .await
            .unwrap();

        ContentFixture {
            chapter_repo,
            handler_parts: (novel_repo, character_repo),
            target,
        }
    }

    #[tokio::test]
    async fn test_generate_content_writes_chapter_on_success() {
        let fx = content_fixture().await;
        let generator = ScriptedGenerator::new(vec![Ok("<p>New chapter</p>".to_string())]);
        let handler = GenerateChapterContentHandler::new(
            fx.handler_parts.0.clone(),
            fx.chapter_repo.clone(),
            fx.handler_parts.1.clone(),
            generator.clone(),
            "English",
        );

        let result = handler
            .handle(GenerateChapterContent {
                chapter_id: fx.target.id,
                prompt: None,
            })
            .await
            .unwrap();

        assert_eq!(result.content, "<p>New chapter</p>");
        let stored = fx.chapter_repo.find_by_id(fx.target.id).await.unwrap().unwrap();
        assert_eq!(stored.content.as_deref(), Some("<p>New chapter</p>"));
        assert_eq!(stored.status, ChapterStatus::Draft);

        let requests = generator.requests.lock().unwrap();
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("Novel Title: The Road Out"));
        assert!(prompt.contains("- Ahmad (Protagonist): Dreamer"));
        assert!(prompt.contains("Chapter 1: Farewell\nThe sun set...."));
        assert!(prompt.contains(DEFAULT_CHAPTER_INSTRUCTIONS));
    }

    #[tokio::test]
    async fn test_generate_content_failure_leaves_chapter_untouched() {
        let fx = content_fixture().await;
        let generator = ScriptedGenerator::new(vec![Err(GenerationError::Timeout)]);
        let handler = GenerateChapterContentHandler::new(
            fx.handler_parts.0.clone(),
            fx.chapter_repo.clone(),
            fx.handler_parts.1.clone(),
            generator,
            "English",
        );

        let err = handler
            .handle(GenerateChapterContent {
                chapter_id: fx.target.id,
                prompt: Some("More dialogue".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Generation(_)));
        let stored = fx.chapter_repo.find_by_id(fx.target.id).await.unwrap().unwrap();
        assert_eq!(stored.content.as_deref(), Some("<p>old draft</p>"));
        assert_eq!(stored.status, ChapterStatus::Final);
    }

    #[tokio::test]
    async fn test_generate_content_unknown_chapter() {
        let fx = content_fixture().await;
        let handler = GenerateChapterContentHandler::new(
            fx.handler_parts.0.clone(),
            fx.chapter_repo.clone(),
            fx.handler_parts.1.clone(),
            ScriptedGenerator::new(vec![]),
            "English",
        );

        let err = handler
            .handle(GenerateChapterContent {
                chapter_id: 9999,
                prompt: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Chapter", .. }));
    }
}

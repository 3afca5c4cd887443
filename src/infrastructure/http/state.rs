//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态。
//! 仓储与生成器在启动时显式注入，没有全局单例。

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateChapterHandler, CreateCharacterHandler, CreateNovelHandler, CreateSettingHandler,
    DeleteChapterHandler, DeleteCharacterHandler, DeleteNovelHandler, DeleteSettingHandler,
    GenerateChapterContentHandler, GeneratePlotHandler, ReorderChaptersHandler,
    UpdateChapterHandler, UpdateCharacterHandler, UpdateNovelHandler, UpdateSettingHandler,
    // Query handlers
    GetChapterHandler, GetCharacterHandler, GetNovelHandler, GetSettingHandler,
    ListChaptersHandler, ListCharactersHandler, ListNovelsHandler, ListSettingsHandler,
    // Ports
    ChapterRepositoryPort, CharacterRepositoryPort, NovelRepositoryPort, SettingRepositoryPort,
    TextGeneratorPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub character_repo: Arc<dyn CharacterRepositoryPort>,
    pub setting_repo: Arc<dyn SettingRepositoryPort>,
    pub text_generator: Arc<dyn TextGeneratorPort>,

    // ========== Command Handlers ==========
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub reorder_chapters_handler: ReorderChaptersHandler,
    pub create_character_handler: CreateCharacterHandler,
    pub update_character_handler: UpdateCharacterHandler,
    pub delete_character_handler: DeleteCharacterHandler,
    pub create_setting_handler: CreateSettingHandler,
    pub update_setting_handler: UpdateSettingHandler,
    pub delete_setting_handler: DeleteSettingHandler,
    pub generate_plot_handler: GeneratePlotHandler,
    pub generate_content_handler: GenerateChapterContentHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub get_character_handler: GetCharacterHandler,
    pub list_characters_handler: ListCharactersHandler,
    pub get_setting_handler: GetSettingHandler,
    pub list_settings_handler: ListSettingsHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `language` 是 AI 生成内容使用的语言
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        character_repo: Arc<dyn CharacterRepositoryPort>,
        setting_repo: Arc<dyn SettingRepositoryPort>,
        text_generator: Arc<dyn TextGeneratorPort>,
        language: &str,
    ) -> Self {
        Self {
            // Ports
            novel_repo: novel_repo.clone(),
            chapter_repo: chapter_repo.clone(),
            character_repo: character_repo.clone(),
            setting_repo: setting_repo.clone(),
            text_generator: text_generator.clone(),

            // Command handlers
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(novel_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(chapter_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(chapter_repo.clone()),
            reorder_chapters_handler: ReorderChaptersHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            create_character_handler: CreateCharacterHandler::new(
                novel_repo.clone(),
                character_repo.clone(),
            ),
            update_character_handler: UpdateCharacterHandler::new(character_repo.clone()),
            delete_character_handler: DeleteCharacterHandler::new(character_repo.clone()),
            create_setting_handler: CreateSettingHandler::new(
                novel_repo.clone(),
                setting_repo.clone(),
            ),
            update_setting_handler: UpdateSettingHandler::new(setting_repo.clone()),
            delete_setting_handler: DeleteSettingHandler::new(setting_repo.clone()),
            generate_plot_handler: GeneratePlotHandler::new(text_generator.clone(), language),
            generate_content_handler: GenerateChapterContentHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                character_repo.clone(),
                text_generator,
                language,
            ),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(novel_repo.clone()),
            list_novels_handler: ListNovelsHandler::new(novel_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(chapter_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(novel_repo.clone(), chapter_repo),
            get_character_handler: GetCharacterHandler::new(character_repo.clone()),
            list_characters_handler: ListCharactersHandler::new(novel_repo.clone(), character_repo),
            get_setting_handler: GetSettingHandler::new(setting_repo.clone()),
            list_settings_handler: ListSettingsHandler::new(novel_repo, setting_repo),
        }
    }
}

//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、TextGenerator、ChapterSaver）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Novel commands
    CreateNovel,
    DeleteNovel,
    UpdateNovel,
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    ReorderChapters,
    UpdateChapter,
    // Character commands
    CreateCharacter,
    DeleteCharacter,
    UpdateCharacter,
    // Setting commands
    CreateSetting,
    DeleteSetting,
    UpdateSetting,
    // Generation commands
    GenerateChapterContent,
    GeneratePlot,
    // Handlers
    handlers::{
        CreateChapterHandler, CreateCharacterHandler, CreateNovelHandler, CreateSettingHandler,
        DeleteChapterHandler, DeleteCharacterHandler, DeleteNovelHandler, DeleteSettingHandler,
        GenerateChapterContentHandler, GeneratePlotHandler, GeneratedContent, PlotCharacter,
        PlotOutline, ReorderChaptersHandler, UpdateChapterHandler, UpdateCharacterHandler,
        UpdateNovelHandler, UpdateSettingHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Repositories
    ChapterRecord,
    ChapterRepositoryPort,
    CharacterRecord,
    CharacterRepositoryPort,
    NovelRecord,
    NovelRepositoryPort,
    RepositoryError,
    SettingRecord,
    SettingRepositoryPort,
    // Text generator
    GenerationError,
    GenerationRequest,
    TextGeneratorPort,
    // Chapter saver
    ChapterDraft,
    ChapterSaverPort,
    SaveError,
};

pub use queries::{
    GetChapter,
    GetCharacter,
    GetNovel,
    GetSetting,
    ListChapters,
    ListCharacters,
    ListNovels,
    ListSettings,
    // Handlers
    handlers::{
        GetChapterHandler, GetCharacterHandler, GetNovelHandler, GetSettingHandler,
        ListChaptersHandler, ListCharactersHandler, ListNovelsHandler, ListSettingsHandler,
    },
};

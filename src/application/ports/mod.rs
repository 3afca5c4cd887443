//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod chapter_saver;
mod repositories;
mod text_generator;

pub use chapter_saver::{ChapterDraft, ChapterSaverPort, SaveError};
pub use repositories::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, CharacterChanges, CharacterRecord,
    CharacterRepositoryPort, NewChapter, NewCharacter, NewNovel, NewSetting, NovelChanges,
    NovelRecord, NovelRepositoryPort, RepositoryError, SettingChanges, SettingRecord,
    SettingRepositoryPort,
};
pub use text_generator::{GenerationError, GenerationRequest, ResponseFormat, TextGeneratorPort};

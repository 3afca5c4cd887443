//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 标题、状态、人物角色等值对象及其校验
//! - 章节重排计划（ReorderPlan）

mod errors;
mod ordering;
mod value_objects;

pub use errors::NovelError;
pub use ordering::{ChapterOrder, ReorderPlan};
pub use value_objects::{
    require_text, validate_order_index, validate_target_word_count, ChapterStatus,
    CharacterRole, NovelStatus, Title, DEFAULT_TARGET_WORD_COUNT,
};

//! Domain Layer - 领域层
//!
//! 包含:
//! - Novel Context: 小说、章节、人物、场景的值对象与章节排序规则
//! - Manuscript: 正文（HTML）处理工具，供 AI 生成上下文使用

pub mod novel;

mod manuscript;

pub use manuscript::{excerpt, strip_html};

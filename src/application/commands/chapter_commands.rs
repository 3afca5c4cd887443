//! Chapter Commands

use crate::domain::novel::ChapterOrder;

/// 创建章节命令
#[derive(Debug, Clone, Default)]
pub struct CreateChapter {
    pub novel_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// 省略时追加到末尾
    pub order_index: Option<i64>,
    pub status: Option<String>,
}

/// 部分更新章节命令
#[derive(Debug, Clone, Default)]
pub struct UpdateChapter {
    pub chapter_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub order_index: Option<i64>,
    pub status: Option<String>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: i64,
}

/// 章节重排命令
///
/// orders 必须覆盖小说当前的全部章节，且 order_index 构成 [0, N) 的排列
#[derive(Debug, Clone)]
pub struct ReorderChapters {
    pub novel_id: i64,
    pub orders: Vec<ChapterOrder>,
}

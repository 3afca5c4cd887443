//! Chapter Queries

#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: i64,
}

/// 列出小说的章节，按 order_index 升序
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: i64,
}

//! Novel Queries

/// 获取小说详情查询
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub novel_id: i64,
}

/// 列出所有小说查询（按标题排序）
#[derive(Debug, Clone)]
pub struct ListNovels;

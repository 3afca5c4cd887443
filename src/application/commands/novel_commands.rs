//! Novel Commands

/// 创建小说命令
///
/// 必填字段以 Option 接收，由 handler 统一校验并给出字段级错误
#[derive(Debug, Clone, Default)]
pub struct CreateNovel {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub summary: Option<String>,
    pub target_word_count: Option<i64>,
    pub status: Option<String>,
}

/// 部分更新小说命令
#[derive(Debug, Clone, Default)]
pub struct UpdateNovel {
    pub novel_id: i64,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub summary: Option<String>,
    pub target_word_count: Option<i64>,
    pub status: Option<String>,
}

/// 删除小说命令（级联删除章节、人物、场景）
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub novel_id: i64,
}

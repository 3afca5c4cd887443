//! Generation Commands - AI 辅助生成

/// 生成故事大纲（不写入数据）
#[derive(Debug, Clone, Default)]
pub struct GeneratePlot {
    pub genre: Option<String>,
    pub theme: Option<String>,
}

/// 为章节生成正文，成功后覆盖章节内容
#[derive(Debug, Clone)]
pub struct GenerateChapterContent {
    pub chapter_id: i64,
    /// 用户的额外写作要求
    pub prompt: Option<String>,
}

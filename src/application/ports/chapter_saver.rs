//! Chapter Saver Port - 编辑器草稿持久化
//!
//! 自动保存控制器只依赖这个端口；生产环境通过 REST 客户端写回服务端，
//! 测试中替换为内存实现。

use async_trait::async_trait;
use thiserror::Error;

/// 保存失败
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SaveError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Save timed out")]
    Timeout,

    #[error("Save rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// 保存任务异常退出（panic 或被取消）
    #[error("Save task aborted: {0}")]
    Aborted(String),
}

/// 单个章节在编辑器中的可编辑字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDraft {
    pub chapter_id: i64,
    pub title: String,
    pub content: String,
}

impl ChapterDraft {
    pub fn new(chapter_id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chapter_id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Chapter Saver Port
#[async_trait]
pub trait ChapterSaverPort: Send + Sync {
    /// 写回章节标题与正文
    async fn save_draft(&self, draft: &ChapterDraft) -> Result<(), SaveError>;
}

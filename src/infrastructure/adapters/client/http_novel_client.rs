//! HTTP Novel Client - 调用本服务的 REST API
//!
//! 编辑器一侧使用：读取章节、提交新的章节顺序、写回草稿。
//! 实现 ChapterSaverPort，供自动保存控制器使用。

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::application::ports::{ChapterDraft, ChapterSaverPort, SaveError};
use crate::domain::novel::ReorderPlan;
use crate::infrastructure::http::dto::{
    ChapterDto, ChapterOrderDto, ChapterRequest, NovelDto, ReorderChaptersRequest,
};
use crate::infrastructure::http::ErrorBody;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// 服务端返回的非 2xx 响应
    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        field: Option<String>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    /// 请求在发送前就被拒绝
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Network(format!("Cannot connect to server: {}", e))
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// REST 客户端配置
#[derive(Debug, Clone)]
pub struct HttpNovelClientConfig {
    /// 服务基础 URL（不含 /api）
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpNovelClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpNovelClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// REST 客户端
pub struct HttpNovelClient {
    client: Client,
    config: HttpNovelClientConfig,
}

impl HttpNovelClient {
    pub fn new(config: HttpNovelClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// 发送请求；非 2xx 时解析 `{"message", "field"}` 错误体
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (message, field) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.message, body.field),
            Err(_) => (text, None),
        };
        tracing::debug!(status = %status, error = %message, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            field,
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get_novel(&self, novel_id: i64) -> Result<NovelDto, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/novels/{}", novel_id)))
            .await
    }

    /// 按 orderIndex 升序返回
    pub async fn list_chapters(&self, novel_id: i64) -> Result<Vec<ChapterDto>, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/novels/{}/chapters", novel_id)))
            .await
    }

    pub async fn get_chapter(&self, chapter_id: i64) -> Result<ChapterDto, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/chapters/{}", chapter_id)))
            .await
    }

    pub async fn create_chapter(
        &self,
        novel_id: i64,
        request: &ChapterRequest,
    ) -> Result<ChapterDto, ClientError> {
        self.send_json(
            self.request(Method::POST, &format!("/novels/{}/chapters", novel_id))
                .json(request),
        )
        .await
    }

    pub async fn update_chapter(
        &self,
        chapter_id: i64,
        request: &ChapterRequest,
    ) -> Result<ChapterDto, ClientError> {
        self.send_json(
            self.request(Method::PUT, &format!("/chapters/{}", chapter_id))
                .json(request),
        )
        .await
    }

    /// 提交拖拽后的完整章节顺序，`chapter_ids` 即新的列表顺序
    ///
    /// 本地先校验没有重复 ID，避免发出一定会被拒绝的请求
    pub async fn reorder_chapters(
        &self,
        novel_id: i64,
        chapter_ids: &[i64],
    ) -> Result<(), ClientError> {
        let plan = ReorderPlan::from_ordered_ids(chapter_ids)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let body = ReorderChaptersRequest {
            orders: plan
                .orders()
                .iter()
                .map(|o| ChapterOrderDto {
                    id: o.chapter_id,
                    order_index: o.order_index,
                })
                .collect(),
        };

        tracing::debug!(novel_id, chapters = body.orders.len(), "Submitting chapter order");

        self.send(
            self.request(Method::POST, &format!("/novels/{}/chapters/reorder", novel_id))
                .json(&body),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChapterSaverPort for HttpNovelClient {
    async fn save_draft(&self, draft: &ChapterDraft) -> Result<(), SaveError> {
        let request = ChapterRequest {
            title: Some(draft.title.clone()),
            content: Some(draft.content.clone()),
            ..Default::default()
        };

        match self.update_chapter(draft.chapter_id, &request).await {
            Ok(_) => Ok(()),
            Err(ClientError::Timeout) => Err(SaveError::Timeout),
            Err(ClientError::Api {
                status, message, ..
            }) => Err(SaveError::Rejected { status, message }),
            Err(e) => Err(SaveError::NetworkError(e.to_string())),
        }
    }
}

//! AI Generation HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::PlotOutline;
use crate::infrastructure::http::dto::{
    GenerateContentRequest, GeneratePlotRequest, GeneratedContentResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 生成故事大纲，不写入任何数据
pub async fn generate_plot(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GeneratePlotRequest>,
) -> Result<Json<PlotOutline>, ApiError> {
    let outline = state
        .generate_plot_handler
        .handle(req.into())
        .await
        .map_err(|e| ApiError::generation_failed(e, "Failed to generate plot"))?;
    Ok(Json(outline))
}

/// 生成章节正文，成功后覆盖章节内容并重置为草稿
pub async fn generate_chapter_content(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<i64>,
    ApiJson(req): ApiJson<GenerateContentRequest>,
) -> Result<Json<GeneratedContentResponse>, ApiError> {
    let generated = state
        .generate_content_handler
        .handle(req.into_command(chapter_id))
        .await
        .map_err(|e| ApiError::generation_failed(e, "Failed to generate content"))?;
    Ok(Json(GeneratedContentResponse {
        content: generated.content,
    }))
}

//! Chapter HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{DeleteChapter, GetChapter, ListChapters};
use crate::infrastructure::http::dto::{ChapterDto, ChapterRequest, ReorderChaptersRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 列出小说的章节（按 orderIndex 升序）
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
) -> Result<Json<Vec<ChapterDto>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters { novel_id })
        .await?;
    Ok(Json(chapters.into_iter().map(ChapterDto::from).collect()))
}

pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<i64>,
) -> Result<Json<ChapterDto>, ApiError> {
    let chapter = state
        .get_chapter_handler
        .handle(GetChapter { chapter_id })
        .await?;
    Ok(Json(chapter.into()))
}

/// POST /chapters，小说 ID 在请求体的 novelId 中
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChapterRequest>,
) -> Result<(StatusCode, Json<ChapterDto>), ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(req.into_create(None))
        .await?;
    Ok((StatusCode::CREATED, Json(chapter.into())))
}

/// POST /novels/:id/chapters
pub async fn create_novel_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
    ApiJson(req): ApiJson<ChapterRequest>,
) -> Result<(StatusCode, Json<ChapterDto>), ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(req.into_create(Some(novel_id)))
        .await?;
    Ok((StatusCode::CREATED, Json(chapter.into())))
}

/// 部分更新，自动保存也走这里
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<i64>,
    ApiJson(req): ApiJson<ChapterRequest>,
) -> Result<Json<ChapterDto>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(req.into_update(chapter_id))
        .await?;
    Ok(Json(chapter.into()))
}

pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_chapter_handler
        .handle(DeleteChapter { chapter_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 重排章节：orders 必须覆盖小说的全部章节
pub async fn reorder_chapters(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
    ApiJson(req): ApiJson<ReorderChaptersRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .reorder_chapters_handler
        .handle(req.into_command(novel_id))
        .await?;
    Ok(StatusCode::OK)
}

//! Novel HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{DeleteNovel, GetNovel, ListNovels};
use crate::infrastructure::http::dto::{CreateNovelRequest, NovelDto, UpdateNovelRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 列出所有小说（按标题排序）
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NovelDto>>, ApiError> {
    let novels = state.list_novels_handler.handle(ListNovels).await?;
    Ok(Json(novels.into_iter().map(NovelDto::from).collect()))
}

pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
) -> Result<Json<NovelDto>, ApiError> {
    let novel = state.get_novel_handler.handle(GetNovel { novel_id }).await?;
    Ok(Json(novel.into()))
}

pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateNovelRequest>,
) -> Result<(StatusCode, Json<NovelDto>), ApiError> {
    let novel = state.create_novel_handler.handle(req.into()).await?;
    Ok((StatusCode::CREATED, Json(novel.into())))
}

pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateNovelRequest>,
) -> Result<Json<NovelDto>, ApiError> {
    let novel = state
        .update_novel_handler
        .handle(req.into_update(novel_id))
        .await?;
    Ok(Json(novel.into()))
}

/// 删除小说，章节、人物、场景一并删除
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_novel_handler
        .handle(DeleteNovel { novel_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

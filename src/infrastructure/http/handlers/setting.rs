//! Setting HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{DeleteSetting, GetSetting, ListSettings};
use crate::infrastructure::http::dto::{SettingDto, SettingRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

pub async fn list_settings(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
) -> Result<Json<Vec<SettingDto>>, ApiError> {
    let settings = state
        .list_settings_handler
        .handle(ListSettings { novel_id })
        .await?;
    Ok(Json(settings.into_iter().map(SettingDto::from).collect()))
}

pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    ApiPath(setting_id): ApiPath<i64>,
) -> Result<Json<SettingDto>, ApiError> {
    let setting = state
        .get_setting_handler
        .handle(GetSetting { setting_id })
        .await?;
    Ok(Json(setting.into()))
}

pub async fn create_setting(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SettingRequest>,
) -> Result<(StatusCode, Json<SettingDto>), ApiError> {
    let setting = state
        .create_setting_handler
        .handle(req.into_create(None))
        .await?;
    Ok((StatusCode::CREATED, Json(setting.into())))
}

pub async fn create_novel_setting(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
    ApiJson(req): ApiJson<SettingRequest>,
) -> Result<(StatusCode, Json<SettingDto>), ApiError> {
    let setting = state
        .create_setting_handler
        .handle(req.into_create(Some(novel_id)))
        .await?;
    Ok((StatusCode::CREATED, Json(setting.into())))
}

pub async fn update_setting(
    State(state): State<Arc<AppState>>,
    ApiPath(setting_id): ApiPath<i64>,
    ApiJson(req): ApiJson<SettingRequest>,
) -> Result<Json<SettingDto>, ApiError> {
    let setting = state
        .update_setting_handler
        .handle(req.into_update(setting_id))
        .await?;
    Ok(Json(setting.into()))
}

pub async fn delete_setting(
    State(state): State<Arc<AppState>>,
    ApiPath(setting_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_setting_handler
        .handle(DeleteSetting { setting_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

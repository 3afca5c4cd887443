//! Character HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{DeleteCharacter, GetCharacter, ListCharacters};
use crate::infrastructure::http::dto::{CharacterDto, CharacterRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
) -> Result<Json<Vec<CharacterDto>>, ApiError> {
    let characters = state
        .list_characters_handler
        .handle(ListCharacters { novel_id })
        .await?;
    Ok(Json(characters.into_iter().map(CharacterDto::from).collect()))
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    ApiPath(character_id): ApiPath<i64>,
) -> Result<Json<CharacterDto>, ApiError> {
    let character = state
        .get_character_handler
        .handle(GetCharacter { character_id })
        .await?;
    Ok(Json(character.into()))
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CharacterRequest>,
) -> Result<(StatusCode, Json<CharacterDto>), ApiError> {
    let character = state
        .create_character_handler
        .handle(req.into_create(None))
        .await?;
    Ok((StatusCode::CREATED, Json(character.into())))
}

pub async fn create_novel_character(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CharacterRequest>,
) -> Result<(StatusCode, Json<CharacterDto>), ApiError> {
    let character = state
        .create_character_handler
        .handle(req.into_create(Some(novel_id)))
        .await?;
    Ok((StatusCode::CREATED, Json(character.into())))
}

pub async fn update_character(
    State(state): State<Arc<AppState>>,
    ApiPath(character_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CharacterRequest>,
) -> Result<Json<CharacterDto>, ApiError> {
    let character = state
        .update_character_handler
        .handle(req.into_update(character_id))
        .await?;
    Ok(Json(character.into()))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    ApiPath(character_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_character_handler
        .handle(DeleteCharacter { character_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

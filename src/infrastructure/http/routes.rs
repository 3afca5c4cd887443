//! HTTP Routes
//!
//! API Endpoints（均以 /api 为前缀）:
//! - /ping                              GET             健康检查
//! - /novels                            GET, POST       列出（按标题）/ 创建小说
//! - /novels/generate-plot              POST            AI 生成大纲
//! - /novels/:id                        GET, PUT, DELETE
//! - /novels/:id/chapters               GET, POST       章节列表（按 orderIndex）/ 创建
//! - /novels/:id/chapters/reorder       POST            章节重排
//! - /novels/:id/characters             GET, POST
//! - /novels/:id/settings               GET, POST
//! - /chapters                          POST            创建章节（请求体带 novelId）
//! - /chapters/:id                      GET, PUT, DELETE
//! - /chapters/:id/generate-content     POST            AI 生成章节正文
//! - /characters, /characters/:id       同上
//! - /settings, /settings/:id           同上

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novels", novel_routes())
        .nest("/chapters", chapter_routes())
        .nest("/characters", character_routes())
        .nest("/settings", setting_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_novels).post(handlers::create_novel))
        .route("/generate-plot", post(handlers::generate_plot))
        .route(
            "/:id",
            get(handlers::get_novel)
                .put(handlers::update_novel)
                .delete(handlers::delete_novel),
        )
        .route(
            "/:id/chapters",
            get(handlers::list_chapters).post(handlers::create_novel_chapter),
        )
        .route("/:id/chapters/reorder", post(handlers::reorder_chapters))
        .route(
            "/:id/characters",
            get(handlers::list_characters).post(handlers::create_novel_character),
        )
        .route(
            "/:id/settings",
            get(handlers::list_settings).post(handlers::create_novel_setting),
        )
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_chapter))
        .route(
            "/:id",
            get(handlers::get_chapter)
                .put(handlers::update_chapter)
                .delete(handlers::delete_chapter),
        )
        .route(
            "/:id/generate-content",
            post(handlers::generate_chapter_content),
        )
}

/// Character 路由
fn character_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_character))
        .route(
            "/:id",
            get(handlers::get_character)
                .put(handlers::update_character)
                .delete(handlers::delete_character),
        )
}

/// Setting 路由
fn setting_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_setting))
        .route(
            "/:id",
            get(handlers::get_setting)
                .put(handlers::update_setting)
                .delete(handlers::delete_setting),
        )
}

//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 前端静态文件托管
#[derive(Debug, Clone)]
pub struct StaticFiles {
    pub dir: PathBuf,
    /// URL 路径前缀
    pub path: String,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_files: Option<StaticFiles>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_files: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            static_files: None,
        }
    }

    pub fn with_static_files(mut self, dir: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        self.static_files = Some(StaticFiles {
            dir: dir.into(),
            path: path.into(),
        });
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 构建带全部中间件的 Router
pub fn build_router(state: Arc<AppState>, static_files: Option<&StaticFiles>) -> Router {
    // CORS 配置 - 允许所有来源的跨域请求
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let mut router = create_routes();

    // 单页应用：未命中的路径回退到 index.html
    if let Some(files) = static_files {
        let index = files.dir.join("index.html");
        let serve_dir = ServeDir::new(&files.dir).fallback(ServeFile::new(index));
        router = if files.path == "/" {
            router.fallback_service(serve_dir)
        } else {
            router.nest_service(&files.path, serve_dir)
        };
        info!(dir = ?files.dir, path = %files.path, "Serving static files");
    }

    router
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    fn router(&self) -> Router {
        build_router(self.state.clone(), self.config.static_files.as_ref())
    }

    /// 在已绑定的 listener 上运行（带优雅关闭）
    pub async fn serve<F>(self, listener: TcpListener, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr();
        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener, shutdown_signal).await
    }
}

//! HTTP Layer - RESTful JSON API

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;


pub use error::{ApiError, ErrorBody};
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig, StaticFiles};
pub use state::AppState;

//! API 路由模块

mod config;
mod directory;
mod health;
mod opportunities;
mod session;

pub use config::config_routes;
pub use directory::directory_routes;
pub use health::health_routes;
pub use opportunities::opportunity_routes;
pub use session::session_routes;

use axum::Router;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(config_routes())
        .merge(opportunity_routes())
        .merge(session_routes())
        .merge(directory_routes())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("route not found".to_string())
}

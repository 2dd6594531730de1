//! CampusConnect - Rust Backend
//!
//! 学生与公司社交平台的后端：基于生成模型的机会推荐、模拟会话和目录筛选。

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// 构建带 CORS 与请求追踪的完整应用
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::create_api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

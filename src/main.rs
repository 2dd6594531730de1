//! CampusConnect - Rust Backend
//!
//! 使用 axum 框架构建的后端服务，提供机会推荐、会话和目录接口。

use anyhow::Context;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_backend::build_app;
use campus_backend::config::get_config;
use campus_backend::state::create_shared_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CampusConnect backend...");

    let config = get_config();
    if config.api_key.is_empty() {
        warn!("No API key configured; set GEMINI_API_KEY or PUT /api/config");
    }

    let state = create_shared_state(&config);
    info!("Session file: {}", state.session.path().display());
    let app = build_app(state);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind_addr))?;
    info!("Server listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}

//! 配置管理端点

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::{get_config, reload_config, update_config, AppConfig};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// 配置响应（隐藏 api_key 的实际值）
#[derive(Serialize)]
pub struct ConfigResponse {
    /// 是否已设置 API 密钥
    pub api_key_set: bool,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl From<AppConfig> for ConfigResponse {
    fn from(config: AppConfig) -> Self {
        Self {
            api_key_set: !config.api_key.is_empty(),
            base_url: config.base_url,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// 配置更新请求
#[derive(Deserialize)]
pub struct ConfigUpdateRequest {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl ConfigUpdateRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AppError::Validation(
                    "temperature must be between 0.0 and 2.0".to_string(),
                ));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(AppError::Validation(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if matches!(&self.model, Some(m) if m.trim().is_empty()) {
            return Err(AppError::Validation("model must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct ConfigUpdateResponse {
    pub success: bool,
    pub message: String,
}

async fn get_config_handler() -> Json<ConfigResponse> {
    Json(ConfigResponse::from(get_config()))
}

/// 更新配置并重建生成器
async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConfigUpdateRequest>, JsonRejection>,
) -> AppResult<Json<ConfigUpdateResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let config = update_config(|config| {
        if let Some(api_key) = req.api_key {
            config.api_key = api_key;
        }
        if let Some(base_url) = req.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = req.model {
            config.model = model;
        }
        if let Some(temperature) = req.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = req.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout_secs) = req.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
    })?;

    state.llm.refresh(&config);
    info!("Config updated: model={}", config.model);

    Ok(Json(ConfigUpdateResponse {
        success: true,
        message: "Config updated successfully".to_string(),
    }))
}

/// 从磁盘重新加载配置
async fn reload_config_handler(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    reload_config();
    let config = get_config();
    state.llm.refresh(&config);
    Json(ConfigResponse::from(config))
}

pub fn config_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/config", get(get_config_handler).put(update_config_handler))
        .route("/api/config/reload", post(reload_config_handler))
}

//! 应用配置管理
//!
//! 提供配置的加载、保存、更新功能，使用全局单例模式管理配置状态。

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::error::AppError;

/// 获取配置文件路径
///
/// 优先使用 `CAMPUS_CONFIG_PATH`，否则为可执行文件同级目录下的 config.json
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CAMPUS_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 生成后端 API 密钥
    #[serde(default)]
    pub api_key: String,

    /// 生成后端基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 最大输出 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 单次生成请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 监听地址
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// 会话文件路径
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// 生成请求日志目录，为空时写到可执行文件旁的 storage/
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_log_dir: Option<String>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "127.0.0.1:8765".to_string()
}

fn default_session_path() -> String {
    "storage/session.json".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            bind_addr: default_bind_addr(),
            session_path: default_session_path(),
            request_log_dir: None,
        }
    }
}

impl AppConfig {
    /// 应用环境变量覆盖
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")) {
            self.api_key = key;
        }
        if let Some(model) = non_empty("CAMPUS_MODEL") {
            self.model = model;
        }
        if let Some(addr) = non_empty("CAMPUS_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(secs) = non_empty("CAMPUS_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(v) => self.timeout_secs = v,
                Err(_) => warn!("Ignoring invalid CAMPUS_TIMEOUT_SECS: {}", secs),
            }
        }
    }
}

/// 全局配置单例
static CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    let mut config = load_config_from_file().unwrap_or_default();
    config.apply_env_overrides(|key| std::env::var(key).ok());
    RwLock::new(config)
});

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Invalid config file {}: {}", path.display(), e);
            None
        }
    }
}

/// 保存配置到文件
fn save_config_to_file(config: &AppConfig) -> Result<(), AppError> {
    let path = get_config_path();
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(&path, content)
        .map_err(|e| AppError::Config(format!("写入配置文件失败: {}", e)))?;
    Ok(())
}

/// 获取当前配置（克隆）
pub fn get_config() -> AppConfig {
    CONFIG.read().clone()
}

/// 更新配置
///
/// 接收一个闭包来修改配置，修改后自动保存到文件
pub fn update_config<F>(updater: F) -> Result<AppConfig, AppError>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = CONFIG.write();
    let mut next = config.clone();
    updater(&mut next);
    save_config_to_file(&next)?;
    *config = next;
    Ok(config.clone())
}

/// 重新从文件加载配置
pub fn reload_config() {
    if let Some(mut config) = load_config_from_file() {
        config.apply_env_overrides(|key| std::env::var(key).ok());
        *CONFIG.write() = config;
    }
}

//! LLM 服务封装
//!
//! 根据配置构建生成器，配置变化后可刷新。

use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::opportunity::{OpportunityError, OpportunityGenerator};
use crate::config::AppConfig;
use crate::llm::{GenerationBackend, GenerationOptions, LlmClient};
use crate::utils::RequestLogger;

/// LLM 服务
pub struct LlmService {
    generator: RwLock<Option<OpportunityGenerator>>,
    logger: Option<Arc<RequestLogger>>,
}

impl LlmService {
    /// 按配置创建服务；未配置 API Key 时生成器为空
    pub fn from_config(config: &AppConfig) -> Self {
        let logger = Arc::new(RequestLogger::new(
            config.request_log_dir.as_ref().map(PathBuf::from),
        ));
        let service = Self {
            generator: RwLock::new(None),
            logger: Some(logger),
        };
        service.refresh(config);
        service
    }

    /// 使用指定后端（测试或嵌入场景）
    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            generator: RwLock::new(Some(OpportunityGenerator::new(backend))),
            logger: None,
        }
    }

    /// 重新读取配置并重建客户端
    pub fn refresh(&self, config: &AppConfig) {
        if config.api_key.trim().is_empty() {
            warn!("API key not configured; opportunity generation disabled");
            *self.generator.write() = None;
            return;
        }

        let client = LlmClient::new(
            &config.api_key,
            &config.base_url,
            &config.model,
            config.timeout_secs,
        )
        .map(|c| {
            c.with_options(GenerationOptions {
                temperature: Some(config.temperature),
                max_output_tokens: Some(config.max_tokens),
            })
        });

        match client {
            Ok(client) => {
                let client = match &self.logger {
                    Some(logger) => client.with_logger(Arc::clone(logger)),
                    None => client,
                };
                info!("Generation backend ready: model={}", client.model());
                *self.generator.write() = Some(OpportunityGenerator::new(Arc::new(client)));
            }
            Err(e) => {
                warn!("Failed to build LLM client: {}", e);
                *self.generator.write() = None;
            }
        }
    }

    /// 生成器是否可用
    pub fn is_ready(&self) -> bool {
        self.generator.read().is_some()
    }

    /// 获取当前生成器
    pub fn generator(&self) -> Result<OpportunityGenerator, OpportunityError> {
        self.generator.read().clone().ok_or_else(|| {
            OpportunityError::Generation(
                "API Key not configured. Please set it in Settings.".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_api_key_generator_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_key: String::new(),
            request_log_dir: Some(dir.path().to_string_lossy().to_string()),
            ..AppConfig::default()
        };
        let service = LlmService::from_config(&config);
        assert!(!service.is_ready());
        assert!(matches!(
            service.generator(),
            Err(OpportunityError::Generation(_))
        ));
    }

    #[test]
    fn test_refresh_enables_generator() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig {
            request_log_dir: Some(dir.path().to_string_lossy().to_string()),
            ..AppConfig::default()
        };
        config.api_key.clear();
        let service = LlmService::from_config(&config);

        config.api_key = "test-key".to_string();
        service.refresh(&config);
        assert!(service.is_ready());
        assert!(service.generator().is_ok());
    }
}

//! Gemini 客户端

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::backend::GenerationBackend;
use super::format::{build_generate_endpoint, strip_json_fences};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GenerationOptions, LlmError, SafetySetting,
};
use crate::utils::RequestLogger;

/// Gemini generateContent 客户端
///
/// 单次调用、不重试；超时由底层 HTTP 客户端控制。
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    options: GenerationOptions,
    timeout_secs: u64,
    logger: Option<Arc<RequestLogger>>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LlmError::ConfigError("Model name is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            model,
            options: GenerationOptions::default(),
            timeout_secs,
            logger: None,
        })
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: Arc<RequestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        build_generate_endpoint(&self.base_url, &self.model)
    }

    /// 调用 generateContent，返回原始响应
    pub async fn generate_content(
        &self,
        prompt: &str,
        safety_settings: &[SafetySetting],
        response_schema: &Value,
    ) -> Result<GenerateContentResponse, LlmError> {
        let endpoint = self.endpoint();
        let request_id = RequestLogger::generate_request_id();
        let start = Instant::now();
        let entry = self.logger.as_ref().map(|logger| {
            logger.log_request(
                &request_id,
                &endpoint,
                &self.model,
                prompt,
                self.timeout_secs,
                &self.api_key,
            )
        });

        info!("LLM request: request_id={}, model={}", request_id, self.model);
        debug!("Gemini API request: endpoint={}, prompt_len={}", endpoint, prompt.len());

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            safety_settings,
            generation_config: GenerationConfig {
                temperature: self.options.temperature,
                max_output_tokens: self.options.max_output_tokens,
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let result = self.send(&endpoint, &payload).await;

        if let (Some(logger), Some(entry)) = (self.logger.as_ref(), entry) {
            match &result {
                Ok(resp) => logger.log_success(
                    entry,
                    start,
                    resp.text().as_deref().unwrap_or_default(),
                    resp.finish_reason(),
                ),
                Err(e) => {
                    let (kind, status) = match e {
                        LlmError::ApiError { status, .. } => ("api_error", Some(*status)),
                        LlmError::Timeout => ("timeout", None),
                        LlmError::JsonError(_) => ("json_error", None),
                        _ => ("http_error", None),
                    };
                    logger.log_error(entry, start, kind, &e.to_string(), status);
                }
            }
        }

        result
    }

    async fn send(
        &self,
        endpoint: &str,
        payload: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: status={}, body={}",
                status_code,
                error_text.chars().take(500).collect::<String>()
            );
            return Err(LlmError::ApiError {
                status: status_code,
                message: error_text,
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::HttpError(e)
    }
}

#[async_trait]
impl GenerationBackend for LlmClient {
    async fn generate_structured(
        &self,
        prompt: &str,
        safety_settings: &[SafetySetting],
        response_schema: &Value,
    ) -> Result<Option<Value>, LlmError> {
        let response = self
            .generate_content(prompt, safety_settings, response_schema)
            .await?;

        if let Some(reason) = response.block_reason() {
            return Err(LlmError::Blocked(reason.to_string()));
        }

        let Some(text) = response.text() else {
            debug!(
                "Gemini returned no text: finish_reason={:?}",
                response.finish_reason()
            );
            return Ok(None);
        };

        let value = serde_json::from_str(strip_json_fences(&text))?;
        Ok(Some(value))
    }
}

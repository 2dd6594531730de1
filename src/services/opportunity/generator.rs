//! 机会推荐生成器

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prompt::{render_prompt, OUTPUT_SCHEMA};
use super::safety::SAFETY_SETTINGS;
use super::types::{OpportunityError, SuggestionRequest, SuggestionResponse};
use crate::llm::GenerationBackend;

/// 机会推荐生成器
///
/// 无状态：每次调用相互独立，不缓存、不重试。
#[derive(Clone)]
pub struct OpportunityGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl OpportunityGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// 校验请求、渲染模板、调用后端并校验输出
    pub async fn generate(
        &self,
        request: SuggestionRequest,
    ) -> Result<SuggestionResponse, OpportunityError> {
        request.validate()?;

        let prompt = render_prompt(&request);
        debug!("Rendered opportunity prompt: len={}", prompt.len());

        let output = self
            .backend
            .generate_structured(&prompt, &SAFETY_SETTINGS, &OUTPUT_SCHEMA)
            .await
            .map_err(|e| {
                warn!("Opportunity generation failed: {}", e);
                OpportunityError::from(e)
            })?;

        let value = output.ok_or_else(|| {
            warn!("Generation backend returned no structured output");
            OpportunityError::Generation("backend returned no structured output".to_string())
        })?;

        let response: SuggestionResponse = serde_json::from_value(value).map_err(|e| {
            warn!("Generation output failed schema validation: {}", e);
            OpportunityError::Generation(format!("output does not match schema: {}", e))
        })?;

        info!(
            "Opportunity generation completed: count={}",
            response.opportunities.len()
        );
        Ok(response)
    }
}

//! 生成后端抽象
//!
//! 服务层只依赖这个 trait，便于在测试中替换为桩实现。

use async_trait::async_trait;
use serde_json::Value;

use super::types::{LlmError, SafetySetting};

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// 发送提示词，返回后端给出的结构化 JSON 输出。
    ///
    /// 后端正常返回但没有任何结构化内容时为 `Ok(None)`。
    async fn generate_structured(
        &self,
        prompt: &str,
        safety_settings: &[SafetySetting],
        response_schema: &Value,
    ) -> Result<Option<Value>, LlmError>;
}

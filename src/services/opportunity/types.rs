//! 机会推荐的请求/响应与错误类型

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::LlmError;

/// 推荐请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// 学生档案摘要（学业、课外活动、行业兴趣等）
    pub student_profile: String,
    /// 学生在平台内的活动摘要（搜索、消息、参加的活动等）
    pub student_activities: String,
}

impl SuggestionRequest {
    pub fn new(student_profile: impl Into<String>, student_activities: impl Into<String>) -> Self {
        Self {
            student_profile: student_profile.into(),
            student_activities: student_activities.into(),
        }
    }

    /// 从未经校验的 JSON 构建请求
    ///
    /// 字段缺失或不是字符串时返回 `Validation`，而不是反序列化错误。
    pub fn from_value(value: &Value) -> Result<Self, OpportunityError> {
        let request = Self {
            student_profile: required_text(value, "studentProfile")?,
            student_activities: required_text(value, "studentActivities")?,
        };
        request.validate()?;
        Ok(request)
    }

    /// 两个字段都必须非空（纯空白视为空）
    pub fn validate(&self) -> Result<(), OpportunityError> {
        if self.student_profile.trim().is_empty() {
            return Err(OpportunityError::Validation(
                "field \"studentProfile\" must be a non-empty string".to_string(),
            ));
        }
        if self.student_activities.trim().is_empty() {
            return Err(OpportunityError::Validation(
                "field \"studentActivities\" must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// 读取 JSON 对象中的字符串字段
///
/// 请求体不是对象、字段缺失、为 null 或不是字符串时返回 `Validation`。
pub fn required_text(value: &Value, name: &str) -> Result<String, OpportunityError> {
    if !value.is_object() {
        return Err(OpportunityError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }
    match value.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(OpportunityError::Validation(format!(
            "field \"{}\" is required",
            name
        ))),
        Some(_) => Err(OpportunityError::Validation(format!(
            "field \"{}\" must be a string",
            name
        ))),
    }
}

/// 推荐结果
///
/// 空列表是合法结果（没有找到合适的机会），与错误区分开。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub opportunities: Vec<String>,
}

/// 机会推荐错误
#[derive(Debug, thiserror::Error)]
pub enum OpportunityError {
    /// 请求不满足输入约束，未调用后端
    #[error("请求校验失败: {0}")]
    Validation(String),

    /// 后端调用失败或输出无法通过校验
    #[error("生成失败: {0}")]
    Generation(String),
}

impl From<LlmError> for OpportunityError {
    fn from(e: LlmError) -> Self {
        OpportunityError::Generation(e.to_string())
    }
}

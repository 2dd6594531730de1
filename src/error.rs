//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::opportunity::OpportunityError;
use crate::services::SessionError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 请求参数不满足约束
    #[error("校验错误: {0}")]
    Validation(String),

    /// 生成后端调用失败
    #[error("生成错误: {0}")]
    Generation(String),

    /// 未登录
    #[error("未登录: {0}")]
    Unauthorized(String),

    /// 无权限
    #[error("无权限: {0}")]
    Forbidden(String),

    /// 资源未找到
    #[error("未找到: {0}")]
    NotFound(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<OpportunityError> for AppError {
    fn from(e: OpportunityError) -> Self {
        match e {
            OpportunityError::Validation(msg) => AppError::Validation(msg),
            OpportunityError::Generation(msg) => AppError::Generation(msg),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidAccount(msg) => AppError::Validation(msg),
            SessionError::PasswordMismatch => AppError::Validation(e.to_string()),
            SessionError::NotLoggedIn => AppError::Unauthorized(e.to_string()),
            SessionError::ProfileKindMismatch { .. } => AppError::Validation(e.to_string()),
            SessionError::Io(_) | SessionError::Serialize(_) => AppError::Internal(e.to_string()),
        }
    }
}

/// 请求体缺失、不是 JSON 或字段类型不对
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let error_message = match self {
            AppError::Config(msg)
            | AppError::Validation(msg)
            | AppError::Generation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Internal(msg) => msg,
        };

        let body = Json(json!({
            "success": false,
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_errors_map_to_status() {
        let validation: AppError = OpportunityError::Validation("empty".to_string()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let generation: AppError = OpportunityError::Generation("boom".to_string()).into();
        assert_eq!(generation.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_session_errors_map_to_status() {
        let err: AppError = SessionError::NotLoggedIn.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: AppError = SessionError::InvalidAccount("bad".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = SessionError::PasswordMismatch.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

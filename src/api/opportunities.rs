//! 机会推荐端点

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::UserKind;
use crate::services::opportunity::{
    required_text, summarize_student_profile, SuggestionRequest, SuggestionResponse,
};
use crate::state::AppState;

/// 按请求中的档案与活动文本生成推荐
///
/// 请求体按原始 JSON 接收，字段缺失或类型不对都归为校验错误。
async fn generate_opportunities(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<SuggestionResponse>> {
    let Json(body) = payload?;
    let request = SuggestionRequest::from_value(&body)?;
    let generator = state.llm.generator()?;
    let response = generator.generate(request).await?;
    Ok(Json(response))
}

/// 基于当前登录学生的档案生成推荐
///
/// 请求体只需 `studentActivities`，档案文本由服务端根据会话生成。
async fn suggest_for_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<SuggestionResponse>> {
    let Json(body) = payload?;
    let user = state.session.current_user().ok_or_else(|| {
        AppError::Unauthorized("Please log in to discover personalized opportunities.".to_string())
    })?;
    if user.kind != UserKind::Student {
        return Err(AppError::Forbidden(
            "The AI Opportunity Generator is currently available for student accounts."
                .to_string(),
        ));
    }

    info!("Generating opportunities for session: user_id={}", user.id);
    let activities = required_text(&body, "studentActivities")?;
    let request = SuggestionRequest::new(summarize_student_profile(&user), activities);
    let generator = state.llm.generator()?;
    let response = generator.generate(request).await?;
    Ok(Json(response))
}

pub fn opportunity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/opportunities/generate", post(generate_opportunities))
        .route("/api/opportunities/suggest", post(suggest_for_session))
}

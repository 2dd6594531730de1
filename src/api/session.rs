//! 会话端点（模拟登录）

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, ProfileUpdate, SessionResponse, SignupRequest, User};
use crate::services::{SessionError, SessionStore};
use crate::state::AppState;

/// 在阻塞线程上执行会话文件读写
async fn with_session<T, F>(state: Arc<AppState>, op: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&SessionStore) -> Result<T, SessionError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state.session))
        .await
        .map_err(|e| AppError::Internal(format!("session task failed: {e}")))?
        .map_err(AppError::from)
}

async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: state.session.current_user(),
    })
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(req) = payload?;
    with_session(state, move |session| session.login(req))
        .await
        .map(Json)
}

async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(req) = payload?;
    with_session(state, move |session| session.signup(req))
        .await
        .map(Json)
}

async fn logout(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    with_session(state, |session| session.logout()).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(update) = payload?;
    with_session(state, move |session| session.update_profile(update))
        .await
        .map(Json)
}

pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session).delete(logout))
        .route("/api/session/login", post(login))
        .route("/api/session/signup", post(signup))
        .route("/api/session/profile", put(update_profile))
}

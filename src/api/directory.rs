//! 目录端点：学生、公司、活动列表

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    Company, CompanyQuery, Event, EventQuery, FacetsResponse, ListResponse, Student,
    StudentQuery,
};
use crate::state::AppState;

async fn list_students(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StudentQuery>,
) -> Json<ListResponse<Student>> {
    Json(state.directory.students(&query).into())
}

async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Student>> {
    state
        .directory
        .student(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("student {}", id)))
}

async fn list_companies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> Json<ListResponse<Company>> {
    Json(state.directory.companies(&query).into())
}

async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Company>> {
    state
        .directory
        .company(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("company {}", id)))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventQuery>,
) -> Json<ListResponse<Event>> {
    Json(state.directory.events(&query).into())
}

async fn facets(State(state): State<Arc<AppState>>) -> Json<FacetsResponse> {
    Json(state.directory.facets())
}

pub fn directory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/students", get(list_students))
        .route("/api/students/:id", get(get_student))
        .route("/api/companies", get(list_companies))
        .route("/api/companies/:id", get(get_company))
        .route("/api/events", get(list_events))
        .route("/api/directory/facets", get(facets))
}

#[cfg(test)]
mod tests {
    use crate::api::create_api_routes;
    use crate::config::AppConfig;
    use crate::services::{Directory, LlmService, SessionStore};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(dir: &tempfile::TempDir) -> Router {
        let config = AppConfig {
            request_log_dir: Some(dir.path().to_string_lossy().to_string()),
            ..AppConfig::default()
        };
        create_api_routes(Arc::new(AppState::new(
            LlmService::from_config(&config),
            SessionStore::load_or_create(dir.path().join("session.json")),
            Directory::seeded(),
        )))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_students_filtered_by_query_string() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(test_app(&dir), "/api/students?q=bob&skill=AutoCAD").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Bob The Builder");
    }

    #[tokio::test]
    async fn test_events_filtered_by_type() {
        let dir = tempfile::tempdir().unwrap();
        let (_, body) = get(test_app(&dir), "/api/events?type=Networking").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["date"], "2024-09-28");
    }

    #[tokio::test]
    async fn test_unknown_company_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(test_app(&dir), "/api/companies/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_json_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(test_app(&dir), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "route not found");
    }
}

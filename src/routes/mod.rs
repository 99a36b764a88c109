//! Router assembly: REST endpoints, JSON 404 fallback, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST API under `/api/...`
/// - JSON 404 for anything else
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::http_root))
        .route("/api/health", get(http::http_health))
        .route("/api/subjects", get(http::http_list_subjects))
        .route("/api/subjects/:id", get(http::http_get_subject))
        .route("/api/chapters/:subject_id", get(http::http_list_chapters))
        .route("/api/chapters/:subject_id/:chapter_id", get(http::http_get_chapter))
        .route("/api/ai/generate", post(http::http_post_generate))
        .route("/api/ai/chat", post(http::http_post_chat))
        .route("/api/ai/test", get(http::http_ai_test))
        .fallback(http::http_not_found)
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Prompts;
    use crate::fixtures::{tests::fixture_dir, FixtureStore};
    use crate::logic::tests::{agent_at, fake_agent};

    fn app(dir: &std::path::Path) -> Router {
        let state = AppState::with_parts(FixtureStore::new(dir), None, Prompts::default());
        build_router(Arc::new(state))
    }

    fn app_with_agent(dir: &std::path::Path, endpoint: String) -> Router {
        let state = AppState::with_parts(FixtureStore::new(dir), Some(agent_at(endpoint)), Prompts::default());
        build_router(Arc::new(state))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_and_root() {
        let dir = fixture_dir();
        let (s, v) = send(app(dir.path()), get_req("/api/health")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["service"], "Revision Platform API");
        assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));

        let (s, v) = send(app(dir.path()), get_req("/")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["endpoints"]["aiGenerate"], "/api/ai/generate");
    }

    #[tokio::test]
    async fn subject_endpoints() {
        let dir = fixture_dir();
        let (s, v) = send(app(dir.path()), get_req("/api/subjects")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v.as_array().unwrap().len(), 2);

        let (s, v) = send(app(dir.path()), get_req("/api/subjects/physics")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["chapterCount"], 2);

        let (s, v) = send(app(dir.path()), get_req("/api/subjects/history")).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(v, json!({"error": "Subject not found"}));
    }

    #[tokio::test]
    async fn chapter_endpoints() {
        let dir = fixture_dir();
        let (s, v) = send(app(dir.path()), get_req("/api/chapters/physics")).await;
        assert_eq!(s, StatusCode::OK);
        assert!(v.as_array().unwrap().iter().all(|c| c["subjectId"] == "physics"));

        let (s, v) = send(app(dir.path()), get_req("/api/chapters/unknown-subject")).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(v, json!({"error": "No chapters found for this subject"}));

        let (s, v) = send(app(dir.path()), get_req("/api/chapters/chemistry/intro")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["name"], "Basic Concepts");

        let (s, v) = send(app(dir.path()), get_req("/api/chapters/chemistry/kinematics")).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(v, json!({"error": "Chapter not found"}));
    }

    #[tokio::test]
    async fn missing_fixture_file_is_500() {
        let empty = tempfile::tempdir().unwrap();
        let (s, v) = send(app(empty.path()), get_req("/api/subjects")).await;
        assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(v["error"], "Failed to load subjects");
        assert!(v["message"].as_str().unwrap().contains("subjects.json"));
    }

    #[tokio::test]
    async fn generate_revision_with_mock_agent() {
        let dir = fixture_dir();
        let (s, v) = send(
            app(dir.path()),
            post_json("/api/ai/generate", json!({"mode": "revision", "subject": "Physics", "chapter": "Kinematics"})),
        ).await;
        assert_eq!(s, StatusCode::OK);
        assert!(v["content"].as_str().unwrap().contains("# Kinematics - Revision Notes"));
        assert_eq!(v["metadata"]["mode"], "revision");
        assert_eq!(v["metadata"]["subject"], "Physics");
        assert_eq!(v["metadata"]["chapter"], "Kinematics");
        assert!(v["metadata"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn generate_validates_required_fields() {
        let dir = fixture_dir();
        for body in [
            json!({"subject": "Physics", "chapter": "Kinematics"}),
            json!({"mode": "revision", "chapter": "Kinematics"}),
            json!({"mode": "revision", "subject": "Physics"}),
            json!({"mode": "", "subject": "Physics", "chapter": "Kinematics"}),
        ] {
            let (s, v) = send(app(dir.path()), post_json("/api/ai/generate", body)).await;
            assert_eq!(s, StatusCode::BAD_REQUEST);
            assert_eq!(v, json!({"error": "Missing required fields: mode, subject, chapter"}));
        }

        let (s, v) = send(
            app(dir.path()),
            post_json("/api/ai/generate", json!({"mode": "quiz", "subject": "Physics", "chapter": "Kinematics"})),
        ).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"], "Unsupported mode: quiz");
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_agent() {
        let dir = fixture_dir();
        let (endpoint, rec) = fake_agent(json!({
            "queryResult": {"responseMessages": [{"text": {"text": ["agent reply"]}}]}
        })).await;

        for (uri, body) in [
            ("/api/ai/generate", json!({"subject": "Physics", "chapter": "Kinematics"})),
            ("/api/ai/generate", json!({"mode": "revision", "subject": "", "chapter": "Kinematics"})),
            ("/api/ai/generate", json!({"mode": "quiz", "subject": "Physics", "chapter": "Kinematics"})),
            ("/api/ai/chat", json!({"mode": "chat", "subject": "Physics", "chapter": "Kinematics"})),
            ("/api/ai/chat", json!({"mode": "chat", "chapter": "Kinematics", "message": "hi"})),
        ] {
            let (s, _) = send(app_with_agent(dir.path(), endpoint.clone()), post_json(uri, body)).await;
            assert_eq!(s, StatusCode::BAD_REQUEST);
        }
        assert_eq!(rec.hits(), 0);

        let (s, v) = send(
            app_with_agent(dir.path(), endpoint),
            post_json("/api/ai/chat", json!({"mode": "chat", "subject": "Physics", "chapter": "Kinematics", "message": "hi"})),
        ).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["content"], "agent reply");
        assert_eq!(rec.hits(), 1);
    }

    #[tokio::test]
    async fn chat_accepts_loosely_shaped_history() {
        let dir = fixture_dir();
        let (s, v) = send(
            app(dir.path()),
            post_json("/api/ai/chat", json!({
                "mode": "chat",
                "subject": "Physics",
                "chapter": "Kinematics",
                "message": "Give me an example",
                "history": [
                    {"role": "assistant", "content": "Hello", "timestamp": 1700000000000u64},
                    {"role": "tutor"},
                    {"content": 42}
                ]
            })),
        ).await;
        assert_eq!(s, StatusCode::OK);
        assert!(v["content"].as_str().unwrap().starts_with("Let me explain that concept with a clear example"));
    }

    #[tokio::test]
    async fn malformed_body_uses_nested_error_envelope() {
        let dir = fixture_dir();
        let req = Request::builder()
            .method("POST")
            .uri("/api/ai/generate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (s, v) = send(app(dir.path()), req).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"]["status"], 400);
        assert!(v["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn chat_with_mock_agent() {
        let dir = fixture_dir();
        let (s, v) = send(
            app(dir.path()),
            post_json("/api/ai/chat", json!({
                "mode": "chat",
                "subject": "Physics",
                "chapter": "Kinematics",
                "message": "What's the difference between speed and velocity?",
                "history": [{"role": "assistant", "content": "Hello!", "timestamp": "2024-05-01T10:00:00.000Z"}]
            })),
        ).await;
        assert_eq!(s, StatusCode::OK);
        assert!(v["content"].as_str().unwrap().contains("Let me clarify the differences"));
        assert!(v["timestamp"].is_string());

        let (s, v) = send(
            app(dir.path()),
            post_json("/api/ai/chat", json!({"mode": "chat", "subject": "Physics", "chapter": "Kinematics"})),
        ).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(v, json!({"error": "Missing required fields: mode, subject, chapter, message"}));
    }

    #[tokio::test]
    async fn ai_test_reports_unconfigured_agent() {
        let dir = fixture_dir();
        let (s, v) = send(app(dir.path()), get_req("/api/ai/test")).await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(v["message"], "AI service is running");
        assert_eq!(v["vertexAIConfigured"], false);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let dir = fixture_dir();
        let (s, v) = send(app(dir.path()), get_req("/api/nope")).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(v, json!({"error": "Endpoint not found", "path": "/api/nope"}));
    }
}

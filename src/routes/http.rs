//! HTTP endpoint handlers. These are thin wrappers that validate input and
//! forward to the fixture store or the agent proxy.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Path, State},
  http::{StatusCode, Uri},
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::content::default_request;
use crate::domain::{Chapter, Subject};
use crate::error::ApiError;
use crate::logic::{chat_reply, generate_content};
use crate::protocol::*;
use crate::state::AppState;
use crate::util::now_iso;

#[instrument(level = "info")]
pub async fn http_root() -> impl IntoResponse {
  Json(ServiceInfoOut {
    message: SERVICE_NAME,
    version: env!("CARGO_PKG_VERSION"),
    endpoints: EndpointsOut {
      health: "/api/health",
      subjects: "/api/subjects",
      chapters: "/api/chapters/:subjectId",
      ai_generate: "/api/ai/generate",
      ai_chat: "/api/ai/chat",
    },
  })
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { status: "ok".into(), timestamp: now_iso(), service: SERVICE_NAME.into() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_subjects(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Subject>>, ApiError> {
  let subjects = state.fixtures.list_subjects().map_err(|e| ApiError::internal("Failed to load subjects", e))?;
  info!(target: "fixtures", count = subjects.len(), "HTTP subjects served");
  Ok(Json(subjects))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_subject(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Subject>, ApiError> {
  state.fixtures.get_subject(&id)
    .map_err(|e| ApiError::internal("Failed to load subject", e))?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Subject not found".into()))
}

#[instrument(level = "info", skip(state), fields(%subject_id))]
pub async fn http_list_chapters(
  State(state): State<Arc<AppState>>,
  Path(subject_id): Path<String>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
  let chapters = state.fixtures.list_chapters(&subject_id)
    .map_err(|e| ApiError::internal("Failed to load chapters", e))?;
  if chapters.is_empty() {
    return Err(ApiError::NotFound("No chapters found for this subject".into()));
  }
  info!(target: "fixtures", %subject_id, count = chapters.len(), "HTTP chapters served");
  Ok(Json(chapters))
}

#[instrument(level = "info", skip(state), fields(%subject_id, %chapter_id))]
pub async fn http_get_chapter(
  State(state): State<Arc<AppState>>,
  Path((subject_id, chapter_id)): Path<(String, String)>,
) -> Result<Json<Chapter>, ApiError> {
  state.fixtures.get_chapter(&subject_id, &chapter_id)
    .map_err(|e| ApiError::internal("Failed to load chapter", e))?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Chapter not found".into()))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  body: Result<Json<GenerateIn>, JsonRejection>,
) -> Result<Json<GenerateOut>, ApiError> {
  let Json(body) = body?;
  let req = body.validate()?;
  info!(target: "agent", mode = %req.mode, subject = %req.subject, chapter = %req.chapter, "Generating content");

  let request = req.request.clone().unwrap_or_else(|| default_request(req.mode, &req.subject, &req.chapter));
  let content = generate_content(&state, req.mode, &req.subject, &req.chapter, &request).await;

  Ok(Json(GenerateOut {
    content,
    metadata: GenerateMetadata { mode: req.mode, subject: req.subject, chapter: req.chapter, timestamp: now_iso() },
  }))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_chat(
  State(state): State<Arc<AppState>>,
  body: Result<Json<ChatIn>, JsonRejection>,
) -> Result<Json<ChatOut>, ApiError> {
  let Json(body) = body?;
  let req = body.validate()?;
  info!(target: "agent", mode = %req.mode, subject = %req.subject, chapter = %req.chapter, history_len = req.history.len(), "Processing chat message");

  let content = chat_reply(&state, req.mode, &req.subject, &req.chapter, &req.message, &req.history).await;
  Ok(Json(ChatOut { content, timestamp: now_iso() }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_ai_test(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(AiTestOut {
    message: "AI service is running".into(),
    vertex_ai_configured: state.agent_configured(),
    timestamp: now_iso(),
  })
}

pub async fn http_not_found(uri: Uri) -> impl IntoResponse {
  info!(target: "revision_backend", path = %uri.path(), "No route matched");
  (StatusCode::NOT_FOUND, Json(RouteNotFoundOut { error: "Endpoint not found", path: uri.path().to_string() }))
}

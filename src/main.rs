//! Revision Platform · Backend
//!
//! - Axum HTTP API (subjects, chapters, AI generation/chat)
//! - Optional Dialogflow CX integration (via environment variables)
//!
//! Important env variables:
//!   PORT                   : u16 (default 3001)
//!   DATA_DIR               : directory holding subjects.json / chapters.json (default ./data)
//!   GOOGLE_CLOUD_PROJECT   : enables the agent together with VERTEX_AGENT_ID
//!   GOOGLE_CLOUD_LOCATION  : default "global"
//!   VERTEX_AGENT_ID        : Dialogflow CX agent id
//!   GOOGLE_ACCESS_TOKEN    : bearer token for the agent call
//!   DIALOGFLOW_ENDPOINT    : override the API base URL
//!   TUTOR_CONFIG_PATH      : path to TOML config (prompt wording)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use revision_backend::config::Settings;
use revision_backend::routes::build_router;
use revision_backend::state::AppState;
use revision_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env();

  // Shared read-only state (fixture store, prompts, agent client).
  let state = Arc::new(AppState::new(&settings));

  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "revision_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "revision_backend", error = %e, "Failed to listen for ctrl-c; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "revision_backend", "Shutdown signal received");
}

//! Runtime configuration: server settings, Dialogflow agent coordinates (env),
//! and prompt wording (optional TOML at `TUTOR_CONFIG_PATH`).
//!
//! Env lookups go through a `lookup` closure so tests can feed fixed values.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::util::strip_quotes;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOCATION: &str = "global";

/// Process-level settings for the HTTP server.
#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub data_dir: PathBuf,
}

impl Settings {
  pub fn from_env() -> Self {
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let port = lookup("PORT")
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(DEFAULT_PORT);
    let data_dir = lookup("DATA_DIR")
      .filter(|d| !d.is_empty())
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from("./data"));
    Self { port, data_dir }
  }
}

/// Coordinates of the Dialogflow CX agent. Present only when both the project
/// and the agent id are set; location falls back to `global`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
  pub project_id: String,
  pub location: String,
  pub agent_id: String,
  /// Bearer token sent as `Authorization`. Without it the agent rejects the call
  /// and we fall back to mock content.
  pub access_token: Option<String>,
  pub endpoint: String,
}

impl AgentConfig {
  pub fn from_env() -> Option<Self> {
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
    let non_empty = |k: &str| lookup(k).map(|v| strip_quotes(&v)).filter(|v| !v.trim().is_empty());

    let project_id = non_empty("GOOGLE_CLOUD_PROJECT")?;
    let agent_id = non_empty("VERTEX_AGENT_ID")?;
    let location = non_empty("GOOGLE_CLOUD_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.into());
    let access_token = non_empty("GOOGLE_ACCESS_TOKEN");
    let endpoint = non_empty("DIALOGFLOW_ENDPOINT")
      .map(|e| e.trim_end_matches('/').to_string())
      .unwrap_or_else(|| default_endpoint(&location));

    Some(Self { project_id, location, agent_id, access_token, endpoint })
  }

  /// `projects/{p}/locations/{l}/agents/{a}/sessions/{s}`
  pub fn session_path(&self, session_id: &str) -> String {
    format!(
      "projects/{}/locations/{}/agents/{}/sessions/{}",
      self.project_id, self.location, self.agent_id, session_id
    )
  }
}

/// Regional agents live behind `{location}-dialogflow.googleapis.com`.
pub fn default_endpoint(location: &str) -> String {
  if location == DEFAULT_LOCATION {
    "https://dialogflow.googleapis.com".into()
  } else {
    format!("https://{}-dialogflow.googleapis.com", location)
  }
}

/// Prompt wording sent to the agent. Defaults match the built-in tutor persona;
/// override any field in TOML if you need to tune tone/structure.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prompts {
  pub revision_instructions: String,
  pub assessment_instructions: String,
  pub chat_instructions: String,
  /// Placeholders: {mode} {subject} {chapter} {instructions} {request}
  pub prompt_template: String,
  /// Placeholders: {mode} {subject} {chapter} {message}
  pub chat_context_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      revision_instructions: "You are an expert tutor. Generate comprehensive revision notes with key concepts, definitions, formulas, and important points. Structure the content clearly with headings and bullet points.".into(),
      assessment_instructions: "You are an exam preparation expert. Generate practice questions including MCQs, short answer questions, and problem-solving exercises with varying difficulty levels.".into(),
      chat_instructions: "You are a helpful educational assistant. Provide clear explanations and be ready to answer follow-up questions about the topic.".into(),
      prompt_template: "Context:\n- Mode: {mode}\n- Subject: {subject}\n- Chapter: {chapter}\n\nInstructions: {instructions}\n\nRequest: {request}\n\nPlease provide educational content appropriate for students studying this topic.".into(),
      chat_context_template: "Context: {mode} mode for {subject} - {chapter}\n\nStudent Question: {message}".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TutorConfig>(&s) {
      Ok(cfg) => {
        info!(target: "revision_backend", %path, "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "revision_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "revision_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

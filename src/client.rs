//! HTTP client for the backend API, used by the terminal wizard.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Chapter, Subject};
use crate::protocol::{ChatIn, ChatOut, GenerateIn, GenerateOut, HealthOut};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("API returned {status}: {message}")]
  Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    // Generous timeout: the agent call alone may take up to 20 s.
    let client = reqwest::Client::builder().timeout(Duration::from_secs(60)).build()?;
    Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
  }

  /// Base URL from REVISION_API_URL, defaulting to the local server.
  pub fn from_env() -> Result<Self, ClientError> {
    let url = std::env::var("REVISION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    Self::new(url)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn read<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(ClientError::Api { status: status.as_u16(), message: error_message(&body).unwrap_or(body) });
    }
    Ok(res.json().await?)
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
    let url = format!("{}{}", self.base_url, path);
    debug!(target: "client", %url, "GET");
    let res = self.client.get(&url).header(USER_AGENT, "study-wizard/0.1").send().await?;
    Self::read(res).await
  }

  async fn post<B: serde::Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
    let url = format!("{}{}", self.base_url, path);
    debug!(target: "client", %url, "POST");
    let res = self.client.post(&url).header(USER_AGENT, "study-wizard/0.1").json(body).send().await?;
    Self::read(res).await
  }

  pub async fn health(&self) -> Result<HealthOut, ClientError> {
    self.get("/api/health").await
  }

  pub async fn list_subjects(&self) -> Result<Vec<Subject>, ClientError> {
    self.get("/api/subjects").await
  }

  pub async fn list_chapters(&self, subject_id: &str) -> Result<Vec<Chapter>, ClientError> {
    self.get(&format!("/api/chapters/{}", subject_id)).await
  }

  #[instrument(level = "debug", skip(self, body))]
  pub async fn generate(&self, body: &GenerateIn) -> Result<GenerateOut, ClientError> {
    self.post("/api/ai/generate", body).await
  }

  #[instrument(level = "debug", skip(self, body))]
  pub async fn chat(&self, body: &ChatIn) -> Result<ChatOut, ClientError> {
    self.post("/api/ai/chat", body).await
  }
}

/// Pull a readable message out of either error envelope:
/// `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_message(body: &str) -> Option<String> {
  let v: serde_json::Value = serde_json::from_str(body).ok()?;
  let err = v.get("error")?;
  err.as_str()
    .or_else(|| err.get("message").and_then(|m| m.as_str()))
    .map(str::to_string)
}

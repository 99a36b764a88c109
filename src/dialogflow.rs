//! Minimal Dialogflow CX client: one `detectIntent` call per request.
//!
//! Each call opens a fresh session (random UUID), so the agent keeps no
//! conversational state between turns. Calls are instrumented and log session
//! ids, latencies, and response sizes; a short reply preview goes to debug.
//!
//! NOTE: We never log the access token.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::util::trunc_for_log;

const LANGUAGE_CODE: &str = "en";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum AgentError {
  #[error("transport error: {0}")]
  Http(#[from] reqwest::Error),
  #[error("Dialogflow HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("undecodable detectIntent response: {0}")]
  Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct Dialogflow {
  pub client: reqwest::Client,
  pub config: AgentConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentRequest<'a> {
  query_input: QueryInput<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryInput<'a> {
  text: TextInput<'a>,
  language_code: &'a str,
}

#[derive(Serialize)]
struct TextInput<'a> {
  text: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentResponse {
  #[serde(default)]
  pub query_result: Option<QueryResult>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
  #[serde(default)]
  pub response_messages: Vec<ResponseMessage>,
}

#[derive(Deserialize, Default)]
pub struct ResponseMessage {
  #[serde(default)]
  pub text: Option<ResponseText>,
}

#[derive(Deserialize, Default)]
pub struct ResponseText {
  #[serde(default)]
  pub text: Vec<String>,
}

impl DetectIntentResponse {
  /// Each message's fragments joined by a space, one line per message, trimmed.
  /// Empty when the agent produced no text.
  pub fn text(&self) -> String {
    let mut out = String::new();
    let messages = self.query_result.as_ref().map(|r| r.response_messages.as_slice()).unwrap_or(&[]);
    for m in messages {
      if let Some(t) = &m.text {
        if !t.text.is_empty() {
          out.push_str(&t.text.join(" "));
          out.push('\n');
        }
      }
    }
    out.trim().to_string()
  }
}

impl Dialogflow {
  /// Construct the client if the agent coordinates are configured; otherwise None.
  pub fn from_env() -> Option<Self> {
    Self::new(AgentConfig::from_env()?)
  }

  pub fn new(config: AgentConfig) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| error!(target: "agent", error = %e, "Failed to build HTTP client"))
      .ok()?;
    Some(Self { client, config })
  }

  /// Send one text turn in a brand-new session and return the agent's reply text.
  #[instrument(level = "info", skip(self, text), fields(text_len = text.len()))]
  pub async fn detect_intent(&self, text: &str) -> Result<String, AgentError> {
    let session_id = Uuid::new_v4().to_string();
    let session = self.config.session_path(&session_id);
    let url = format!("{}/v3/{}:detectIntent", self.config.endpoint, session);
    let body = DetectIntentRequest {
      query_input: QueryInput { text: TextInput { text }, language_code: LANGUAGE_CODE },
    };

    let mut req = self.client.post(&url)
      .header(USER_AGENT, "revision-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&body);
    if let Some(token) = &self.config.access_token {
      req = req.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    let start = Instant::now();
    let res = req.send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_google_error(&body).unwrap_or(body);
      return Err(AgentError::Status { status, message });
    }

    let bytes = res.bytes().await?;
    let parsed: DetectIntentResponse = serde_json::from_slice(&bytes)?;
    let reply = parsed.text();
    info!(target: "agent", %session_id, elapsed = ?start.elapsed(), reply_len = reply.len(), "Dialogflow response received");
    debug!(target: "agent", %session_id, preview = %trunc_for_log(&reply, 160), "Dialogflow reply preview");
    Ok(reply)
  }
}

/// Google APIs wrap failures as `{"error": {"code", "message", "status"}}`.
fn extract_google_error(body: &str) -> Option<String> {
  let v: serde_json::Value = serde_json::from_str(body).ok()?;
  v.get("error")?.get("message")?.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn joins_fragments_per_message_and_lines_between_messages() {
    let raw = r#"{"queryResult":{"responseMessages":[
      {"text":{"text":["Kinematics","studies motion."]}},
      {"payload":{"x":1}},
      {"text":{"text":[]}},
      {"text":{"text":["Ask me anything."]}}
    ]}}"#;
    let resp: DetectIntentResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.text(), "Kinematics studies motion.\nAsk me anything.");
  }

  #[test]
  fn missing_query_result_is_empty_text() {
    let resp: DetectIntentResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(resp.text(), "");
  }

  #[test]
  fn request_body_matches_detect_intent_shape() {
    let body = DetectIntentRequest {
      query_input: QueryInput { text: TextInput { text: "hi" }, language_code: LANGUAGE_CODE },
    };
    let v = serde_json::to_value(&body).unwrap();
    assert_eq!(v, serde_json::json!({"queryInput": {"text": {"text": "hi"}, "languageCode": "en"}}));
  }

  #[test]
  fn google_error_message_is_extracted() {
    let body = r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#;
    assert_eq!(extract_google_error(body).as_deref(), Some("Permission denied"));
    assert_eq!(extract_google_error("<html>"), None);
  }
}

//! Public HTTP protocol structs (serde ready), shared by the server and the
//! wizard's HTTP client. Keep this small and stable to evolve backend and
//! frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::Mode;
use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Revision Platform API";

pub const GENERATE_REQUIRED: &str = "Missing required fields: mode, subject, chapter";
pub const CHAT_REQUIRED: &str = "Missing required fields: mode, subject, chapter, message";

//
// AI generation
//

/// Raw body of `POST /api/ai/generate`. Every field is optional at the wire
/// level so a missing field is reported as a 400 by `validate`, not as a
/// deserialization rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

/// Validated generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: Mode,
    pub subject: String,
    pub chapter: String,
    pub request: Option<String>,
}

impl GenerateIn {
    pub fn validate(self) -> Result<GenerationRequest, ApiError> {
        let (Some(mode), Some(subject), Some(chapter)) =
            (present(self.mode), present(self.subject), present(self.chapter))
        else {
            return Err(ApiError::Validation(GENERATE_REQUIRED.into()));
        };
        let mode = mode.parse::<Mode>().map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(GenerationRequest { mode, subject, chapter, request: present(self.request) })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateOut {
    pub content: String,
    pub metadata: GenerateMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateMetadata {
    pub mode: Mode,
    pub subject: String,
    pub chapter: String,
    pub timestamp: String,
}

//
// AI chat
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Prior turns, kept untyped: they are counted and logged, never
    /// interpreted, so an odd entry must not reject the turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<serde_json::Value>>,
}

/// Validated chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub mode: Mode,
    pub subject: String,
    pub chapter: String,
    pub message: String,
    pub history: Vec<serde_json::Value>,
}

impl ChatIn {
    pub fn validate(self) -> Result<ChatRequest, ApiError> {
        let (Some(mode), Some(subject), Some(chapter), Some(message)) = (
            present(self.mode),
            present(self.subject),
            present(self.chapter),
            present(self.message),
        ) else {
            return Err(ApiError::Validation(CHAT_REQUIRED.into()));
        };
        let mode = mode.parse::<Mode>().map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(ChatRequest { mode, subject, chapter, message, history: self.history.unwrap_or_default() })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatOut {
    pub content: String,
    pub timestamp: String,
}

/// Empty strings count as missing.
fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

//
// Service endpoints
//

#[derive(Debug, Serialize, Deserialize)]
pub struct AiTestOut {
    pub message: String,
    #[serde(rename = "vertexAIConfigured")]
    pub vertex_ai_configured: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOut {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfoOut {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointsOut,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsOut {
    pub health: &'static str,
    pub subjects: &'static str,
    pub chapters: &'static str,
    pub ai_generate: &'static str,
    pub ai_chat: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RouteNotFoundOut {
    pub error: &'static str,
    pub path: String,
}

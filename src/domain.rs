//! Domain models: learning modes, subjects/chapters fixtures, and chat messages.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which kind of study content the student asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// Structured revision notes.
  Revision,
  /// Practice questions (MCQs, short answers, problems).
  Assessment,
  /// Conversational tutoring.
  Chat,
}

impl Mode {
  pub const ALL: [Mode; 3] = [Mode::Revision, Mode::Assessment, Mode::Chat];

  pub fn as_str(self) -> &'static str {
    match self {
      Mode::Revision => "revision",
      Mode::Assessment => "assessment",
      Mode::Chat => "chat",
    }
  }

  /// Capitalised label, e.g. "Revision Mode" headers.
  pub fn label(self) -> &'static str {
    match self {
      Mode::Revision => "Revision",
      Mode::Assessment => "Assessment",
      Mode::Chat => "Chat",
    }
  }

  pub fn emoji(self) -> &'static str {
    match self {
      Mode::Revision => "🚀",
      Mode::Assessment => "📝",
      Mode::Chat => "💬",
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unsupported mode: {}", self.0)
  }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
  type Err = UnknownMode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "revision" => Ok(Mode::Revision),
      "assessment" => Ok(Mode::Assessment),
      "chat" => Ok(Mode::Chat),
      other => Err(UnknownMode(other.to_string())),
    }
  }
}

/// A subject fixture (e.g. Physics).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  pub id: String,
  pub name: String,
  #[serde(default)] pub icon: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub chapter_count: u32,
}

/// A chapter fixture. Only meaningful together with its `subject_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
  pub id: String,
  pub subject_id: String,
  pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub difficulty: String,
  #[serde(default)] pub topic_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

/// One chat bubble. Append-only within a session, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
  pub role: Role,
  pub content: String,
  #[serde(default)] pub timestamp: Option<String>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub error: bool,
}

impl Message {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into(), timestamp: Some(crate::util::now_iso()), error: false }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into(), timestamp: Some(crate::util::now_iso()), error: false }
  }

  pub fn assistant_error(content: impl Into<String>) -> Self {
    Self { error: true, ..Self::assistant(content) }
  }
}

//! Agent proxy: the one place that decides between the real agent and mock content.
//!
//! Upstream failures (unconfigured agent, transport/HTTP error, empty reply)
//! are logged and replaced by deterministic mock text. Callers only ever get
//! usable content.

use tracing::{error, info, instrument, warn};

use crate::content::{build_prompt, chat_context_message, mock_chat_reply, mock_content};
use crate::domain::Mode;
use crate::state::AppState;

/// Initial study content for (mode, subject, chapter).
#[instrument(level = "info", skip(state, request), fields(%mode, %subject, %chapter, request_len = request.len()))]
pub async fn generate_content(state: &AppState, mode: Mode, subject: &str, chapter: &str, request: &str) -> String {
  let Some(agent) = &state.agent else {
    warn!(target: "agent", "Dialogflow CX not configured, using mock response");
    return mock_content(mode, subject, chapter);
  };

  let prompt = build_prompt(&state.prompts, mode, subject, chapter, request);
  match agent.detect_intent(&prompt).await {
    Ok(text) if !text.is_empty() => {
      info!(target: "agent", reply_len = text.len(), "Received response from Dialogflow CX");
      text
    }
    Ok(_) => {
      warn!(target: "agent", "Empty response from agent, using mock response");
      mock_content(mode, subject, chapter)
    }
    Err(e) => {
      error!(target: "agent", error = %e, "Dialogflow CX call failed; falling back to mock response");
      mock_content(mode, subject, chapter)
    }
  }
}

/// One chat turn. `history` is only logged: every agent call opens a fresh
/// session, so prior turns are not forwarded.
#[instrument(level = "info", skip(state, message, history), fields(%mode, %subject, %chapter, message_len = message.len(), history_len = history.len()))]
pub async fn chat_reply(
  state: &AppState,
  mode: Mode,
  subject: &str,
  chapter: &str,
  message: &str,
  history: &[serde_json::Value],
) -> String {
  let Some(agent) = &state.agent else {
    warn!(target: "agent", "Dialogflow CX not configured, using mock chat response");
    return mock_chat_reply(message, subject, chapter);
  };

  let contextual = chat_context_message(&state.prompts, mode, subject, chapter, message);
  match agent.detect_intent(&contextual).await {
    Ok(text) if !text.is_empty() => {
      info!(target: "agent", reply_len = text.len(), "Received chat response from Dialogflow CX");
      text
    }
    Ok(_) => {
      warn!(target: "agent", "Empty chat response, using mock response");
      mock_chat_reply(message, subject, chapter)
    }
    Err(e) => {
      error!(target: "agent", error = %e, "Dialogflow CX chat failed; falling back to mock chat response");
      mock_chat_reply(message, subject, chapter)
    }
  }
}

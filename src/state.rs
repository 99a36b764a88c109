//! Application state shared by every handler: fixture store, prompts, and the
//! optional Dialogflow client.
//!
//! Nothing here is mutated after startup, so handlers share it through an `Arc`
//! without locks.

use tracing::{info, instrument};

use crate::config::{load_tutor_config_from_env, Prompts, Settings};
use crate::dialogflow::Dialogflow;
use crate::fixtures::FixtureStore;

#[derive(Clone)]
pub struct AppState {
    pub fixtures: FixtureStore,
    pub agent: Option<Dialogflow>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: settings, prompts (TOML if present), and the agent client.
    #[instrument(level = "info", skip_all)]
    pub fn new(settings: &Settings) -> Self {
        let prompts = load_tutor_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let agent = Dialogflow::from_env();
        if let Some(df) = &agent {
            info!(target: "revision_backend", project = %df.config.project_id, location = %df.config.location, agent = %df.config.agent_id, endpoint = %df.config.endpoint, has_token = df.config.access_token.is_some(), "Dialogflow CX enabled.");
        } else {
            info!(target: "revision_backend", "Dialogflow CX not configured (GOOGLE_CLOUD_PROJECT / VERTEX_AGENT_ID). Using mock content.");
        }
        let fixtures = FixtureStore::new(settings.data_dir.clone());
        info!(target: "revision_backend", data_dir = %fixtures.data_dir().display(), "Serving fixtures");

        Self::with_parts(fixtures, agent, prompts)
    }

    pub fn with_parts(fixtures: FixtureStore, agent: Option<Dialogflow>, prompts: Prompts) -> Self {
        Self { fixtures, agent, prompts }
    }

    pub fn agent_configured(&self) -> bool {
        self.agent.is_some()
    }
}

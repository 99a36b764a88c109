//! Revision Platform · study-content backend
//!
//! - Axum HTTP API over subject/chapter fixtures
//! - Optional Dialogflow CX agent with deterministic mock fallback
//! - Wizard state machine + HTTP client for the terminal front end

pub mod client;
pub mod config;
pub mod content;
pub mod dialogflow;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod logic;
pub mod markdown;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;
pub mod wizard;

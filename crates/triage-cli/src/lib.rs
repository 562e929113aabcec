//! Side-effect triage chat front-end.
//!
//! - [`config`]: startup configuration from arguments and environment
//! - [`assistant`]: per-turn orchestration
//! - [`render`]: terminal transcript output
//! - [`chat`]: the interactive loop

pub mod assistant;
pub mod chat;
pub mod config;
pub mod render;

pub use assistant::{TriageAssistant, TurnError, TurnOutcome, TurnPhase, NOT_FOUND_REPLY};
pub use chat::run_chat;
pub use config::{AppConfig, Cli, ConfigError};
pub use render::{TerminalRenderer, TranscriptSink};

//! Side-Effect Triage Core Library
//!
//! Patient record lookup and conversation state for a chat assistant that
//! asks a hosted model whether reported symptoms are expected medication
//! side effects.
//!
//! # Architecture
//!
//! ```text
//! chat input ──► input::parse_input ──► store::RecordLookup::lookup
//!                      │                          │
//!                  Malformed              episodes.csv  (latest dated row)
//!                      │                  leaflets.csv  (side effects)
//!                      ▼                  summaries.csv (optional)
//!                 FORMAT_HINT                     │
//!                                                 ▼
//!                                          ResolvedRecord ──► prompt / model
//!                                                                  │
//!                                    session::ConversationSession ◄┘
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Episode, ResolvedRecord, ConversationTurn, etc.)
//! - [`store`]: CSV-backed record store with latest-episode selection
//! - [`input`]: Chat input grammar
//! - [`session`]: In-memory conversation history

pub mod input;
pub mod models;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use input::{parse_input, ParsedInput, FORMAT_HINT};
pub use models::{ConversationTurn, Episode, ResolvedRecord, Role};
pub use session::ConversationSession;
pub use store::{CsvRecordStore, RecordLookup, StoreConfig, StoreError, StoreResult};

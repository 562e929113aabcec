//! Domain models for the triage system.

mod conversation;
mod record;

pub use conversation::*;
pub use record::*;

//! Prompt composition and streaming completion for side-effect triage.
//!
//! This crate turns resolved medication facts into a triage prompt and streams
//! the hosted model's answer back as text fragments.

pub mod catalog;
pub mod completion;
pub mod groq;
pub mod prompts;

pub use catalog::*;
pub use completion::*;
pub use groq::{ApiKey, GroqClient, DEFAULT_BASE_URL};
pub use prompts::*;

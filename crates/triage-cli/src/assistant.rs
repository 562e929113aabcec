//! Turn orchestration.
//!
//! One turn moves through
//! `AwaitingInput → Parsed → Resolved → Prompted → Streaming → Completed | Failed`.
//! A failed turn leaves the session untouched and the next turn starts fresh.

use thiserror::Error;
use tracing::{debug, info, warn};
use triage_core::{
    parse_input, ConversationSession, ParsedInput, RecordLookup, StoreError, FORMAT_HINT,
};
use triage_llm::{compose_prompt, CompletionClient, CompletionError, CompletionRequest};

use crate::render::TranscriptSink;

/// Reply when the patient id has no episodes.
pub const NOT_FOUND_REPLY: &str = "User does not exist.";

/// Errors that abort a turn.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Error fetching patient record: {0}")]
    DataSource(#[from] StoreError),

    #[error("Error from completion service: {0}")]
    Completion(#[from] CompletionError),
}

/// Position of a turn in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingInput,
    Parsed,
    Resolved { found: bool },
    Prompted,
    Streaming,
    Completed,
    Failed,
}

/// How a turn ended.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model answered; the reply is in session history.
    Answered { reply: String },
    /// Input did not follow the grammar; no lookup or model call was made.
    FormatRejected,
    PatientNotFound { patient_id: String },
    /// Aborted during `failed_at`. `partial` holds whatever fragments were already shown.
    Failed {
        error: TurnError,
        partial: String,
        failed_at: TurnPhase,
    },
}

impl TurnOutcome {
    pub fn final_phase(&self) -> TurnPhase {
        match self {
            TurnOutcome::Failed { .. } => TurnPhase::Failed,
            _ => TurnPhase::Completed,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TurnOutcome::Failed { .. })
    }
}

/// Drives turns against a record store and a completion service.
pub struct TriageAssistant<S, C> {
    store: S,
    client: C,
    model: String,
    max_tokens: u32,
}

impl<S: RecordLookup, C: CompletionClient> TriageAssistant<S, C> {
    pub fn new(store: S, client: C, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            store,
            client,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Process one user submission to completion or failure.
    pub fn handle_turn(
        &self,
        session: &mut ConversationSession,
        input: &str,
        sink: &mut dyn TranscriptSink,
    ) -> TurnOutcome {
        let mut phase = TurnPhase::AwaitingInput;

        let (patient_id, symptoms) = match parse_input(input) {
            ParsedInput::Parsed {
                patient_id,
                symptoms,
            } => (patient_id, symptoms),
            ParsedInput::Malformed => {
                warn!("Input does not follow the expected pattern");
                sink.assistant_message(FORMAT_HINT);
                session.record_exchange(input, FORMAT_HINT);
                return TurnOutcome::FormatRejected;
            }
        };
        transition(&mut phase, TurnPhase::Parsed);

        let record = match self.store.lookup(&patient_id) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                transition(&mut phase, TurnPhase::Resolved { found: false });
                info!(patient_id = %patient_id, "Patient not found");
                sink.assistant_message(NOT_FOUND_REPLY);
                session.record_exchange(input, NOT_FOUND_REPLY);
                return TurnOutcome::PatientNotFound { patient_id };
            }
            Err(e) => return fail(&mut phase, sink, e.into(), String::new()),
        };
        transition(&mut phase, TurnPhase::Resolved { found: true });

        let prompt = compose_prompt(
            &record.leaflet_ref,
            &record.side_effects,
            &symptoms,
            record.summary.as_deref(),
        );
        debug!(prompt = %prompt, "Composed prompt");
        transition(&mut phase, TurnPhase::Prompted);

        let request = CompletionRequest::new(&self.model, prompt, self.max_tokens);
        let stream = match self.client.stream_complete(&request) {
            Ok(stream) => stream,
            Err(e) => return fail(&mut phase, sink, e.into(), String::new()),
        };
        transition(&mut phase, TurnPhase::Streaming);

        sink.begin_assistant();
        let mut reply = String::new();
        for item in stream {
            match item {
                Ok(fragment) => {
                    sink.fragment(&fragment);
                    reply.push_str(&fragment);
                }
                Err(e) => {
                    sink.end_assistant();
                    return fail(&mut phase, sink, e.into(), reply);
                }
            }
        }
        sink.end_assistant();

        transition(&mut phase, TurnPhase::Completed);
        info!(
            patient_id = %patient_id,
            leaflet = %record.leaflet_ref,
            reply_chars = reply.len(),
            "Turn completed"
        );
        session.record_exchange(input, reply.clone());
        TurnOutcome::Answered { reply }
    }
}

fn transition(phase: &mut TurnPhase, next: TurnPhase) {
    debug!(from = ?phase, to = ?next, "Turn phase");
    *phase = next;
}

fn fail(
    phase: &mut TurnPhase,
    sink: &mut dyn TranscriptSink,
    error: TurnError,
    partial: String,
) -> TurnOutcome {
    let failed_at = *phase;
    transition(phase, TurnPhase::Failed);
    warn!(error = %error, failed_at = ?failed_at, partial_chars = partial.len(), "Turn failed");
    sink.error_banner(&error.to_string());
    TurnOutcome::Failed {
        error,
        partial,
        failed_at,
    }
}

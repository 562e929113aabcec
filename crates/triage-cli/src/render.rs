//! Terminal transcript rendering.

use std::io::Write;

use tracing::warn;
use triage_core::ConversationTurn;
use triage_llm::MODELS;

/// Where a turn's visible output goes.
///
/// Fragments are shown as they arrive; nothing here decides what is kept in
/// session history.
pub trait TranscriptSink {
    /// Open an assistant message that will be filled by fragments.
    fn begin_assistant(&mut self);
    fn fragment(&mut self, text: &str);
    fn end_assistant(&mut self);
    /// Show a complete assistant message in one piece.
    fn assistant_message(&mut self, text: &str);
    fn error_banner(&mut self, message: &str);
}

/// Line-oriented renderer writing to any `Write` (stdout in the binary).
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn welcome(&mut self, model: &str) {
        self.emit(format_args!("🏎️  Side-Effect Triage Chat\n"));
        self.emit(format_args!(
            "Ask whether a patient's symptoms are expected side effects of their medication.\n"
        ));
        self.emit(format_args!("Model: {}\n", model_label(model)));
        self.emit(format_args!(
            "Type `Patient: <id>, the patient said: I have <symptom>, ...` \
             or /history, /models, /quit.\n\n"
        ));
    }

    pub fn prompt_marker(&mut self) {
        self.emit(format_args!("{} > ", triage_core::Role::User.avatar()));
    }

    pub fn history(&mut self, turns: &[ConversationTurn]) {
        if turns.is_empty() {
            self.emit(format_args!("(no messages yet)\n"));
            return;
        }
        for turn in turns {
            self.emit(format_args!("{} {}\n", turn.role.avatar(), turn.content));
        }
    }

    pub fn models(&mut self, active: &str) {
        for model in MODELS {
            let marker = if model.id == active { "*" } else { " " };
            self.emit(format_args!(
                "{} {:<20} {:<28} {:>6} tokens  {}\n",
                marker, model.id, model.name, model.tokens, model.developer
            ));
        }
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        let result = self.out.write_fmt(args).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write transcript");
        }
    }
}

impl<W: Write> TranscriptSink for TerminalRenderer<W> {
    fn begin_assistant(&mut self) {
        self.emit(format_args!("{} ", triage_core::Role::Assistant.avatar()));
    }

    fn fragment(&mut self, text: &str) {
        self.emit(format_args!("{}", text));
    }

    fn end_assistant(&mut self) {
        self.emit(format_args!("\n"));
    }

    fn assistant_message(&mut self, text: &str) {
        self.begin_assistant();
        self.fragment(text);
        self.end_assistant();
    }

    fn error_banner(&mut self, message: &str) {
        self.emit(format_args!("🚨 {}\n", message));
    }
}

fn model_label(id: &str) -> String {
    match triage_llm::find_model(id) {
        Some(model) => format!("{} ({})", model.name, model.developer),
        None => id.to_string(),
    }
}

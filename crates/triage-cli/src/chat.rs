//! Interactive chat loop.

use std::io::{BufRead, Write};

use tracing::info;
use triage_core::{ConversationSession, RecordLookup};
use triage_llm::CompletionClient;

use crate::assistant::TriageAssistant;
use crate::render::TerminalRenderer;

/// Slash commands understood by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    History,
    Models,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "/history" => Some(Command::History),
            "/models" => Some(Command::Models),
            "/quit" | "/exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Run one chat session until `/quit` or end of input.
///
/// Turns are handled strictly one at a time. The session is created here and
/// returned so callers can inspect it; it is never written anywhere.
pub fn run_chat<S, C, R, W>(
    assistant: &TriageAssistant<S, C>,
    mut input: R,
    output: W,
) -> std::io::Result<ConversationSession>
where
    S: RecordLookup,
    C: CompletionClient,
    R: BufRead,
    W: Write,
{
    let mut session = ConversationSession::new();
    let mut renderer = TerminalRenderer::new(output);
    info!(session_id = %session.id(), model = %assistant.model(), "Chat session started");

    renderer.welcome(assistant.model());
    renderer.prompt_marker();

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // Undecodable bytes become U+FFFD so one bad line cannot end the session.
        let line = String::from_utf8_lossy(&buf);
        let text = line.trim();

        match Command::parse(text) {
            Some(Command::Quit) => break,
            Some(Command::History) => renderer.history(session.history()),
            Some(Command::Models) => renderer.models(assistant.model()),
            None if text.is_empty() => {}
            None => {
                assistant.handle_turn(&mut session, text, &mut renderer);
            }
        }
        renderer.prompt_marker();
    }

    info!(session_id = %session.id(), turns = session.len(), "Chat session ended");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/history"), Some(Command::History));
        assert_eq!(Command::parse(" /models "), Some(Command::Models));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(Command::parse("Patient: 1, the patient said: I have"), None);
    }
}

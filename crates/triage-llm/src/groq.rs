//! Groq chat-completion client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` endpoint with
//! `stream: true` and reads the server-sent-event body line by line.

use std::fmt;
use std::io::{BufRead, BufReader, Lines};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::completion::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResult, FragmentStream,
};

/// Public Groq endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// API credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Streaming client for the Groq API.
pub struct GroqClient {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(base_url: &str, api_key: ApiKey, timeout_secs: u64) -> CompletionResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// One `data:` payload of the event stream.
#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ChunkError>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChunkError {
    message: String,
}

/// Meaning of one line of the event stream.
#[derive(Debug, PartialEq, Eq)]
pub enum SseEvent {
    Fragment(String),
    /// Blank lines, comments, other fields and empty deltas
    Skip,
    Done,
}

/// Interpret one line of a chat-completion event stream.
pub fn parse_sse_line(line: &str) -> CompletionResult<SseEvent> {
    let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") else {
        return Ok(SseEvent::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: ChatChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(CompletionError::Stream(error.message));
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default();

    if content.is_empty() {
        Ok(SseEvent::Skip)
    } else {
        Ok(SseEvent::Fragment(content))
    }
}

/// Iterator over content fragments of an event-stream body.
struct SseFragments<R: BufRead> {
    lines: Lines<R>,
    fragments: usize,
}

impl<R: BufRead> Iterator for SseFragments<R> {
    type Item = CompletionResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(CompletionError::Stream(e.to_string()))),
                None => {
                    return Some(Err(CompletionError::Stream(
                        "stream closed before completion marker".into(),
                    )))
                }
            };

            match parse_sse_line(&line) {
                Ok(SseEvent::Fragment(text)) => {
                    self.fragments += 1;
                    return Some(Ok(text));
                }
                Ok(SseEvent::Skip) => continue,
                Ok(SseEvent::Done) => {
                    debug!(fragments = self.fragments, "Completion stream finished");
                    return None;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Wrap any buffered event-stream body as a fragment stream.
pub fn fragment_stream<R: BufRead + 'static>(reader: R) -> FragmentStream {
    FragmentStream::new(SseFragments {
        lines: reader.lines(),
        fragments: 0,
    })
}

impl CompletionClient for GroqClient {
    fn stream_complete(&self, request: &CompletionRequest) -> CompletionResult<FragmentStream> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            stream: true,
        };

        info!(
            model = %request.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "Requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    CompletionError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    CompletionError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    CompletionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(fragment_stream(BufReader::new(response)))
    }
}

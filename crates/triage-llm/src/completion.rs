//! Streaming chat-completion interface.

use std::cell::{Cell, RefCell};
use std::iter::FusedIterator;

use thiserror::Error;

/// Completion service errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Cannot reach completion service at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Stream failed: {0}")]
    Stream(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// One completion call: a single user-role prompt and its token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Finite, single-pass sequence of response fragments.
///
/// Yields fragments in arrival order. After the first error, or once the
/// remote side ends the stream, it only returns `None`.
pub struct FragmentStream {
    inner: Box<dyn Iterator<Item = CompletionResult<String>>>,
    finished: bool,
}

impl FragmentStream {
    pub fn new<I>(inner: I) -> Self
    where
        I: Iterator<Item = CompletionResult<String>> + 'static,
    {
        Self {
            inner: Box::new(inner),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for FragmentStream {
    type Item = CompletionResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            None => {
                self.finished = true;
                None
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            Some(Ok(fragment)) => Some(Ok(fragment)),
        }
    }
}

impl FusedIterator for FragmentStream {}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// A hosted text-generation service that streams its answer.
pub trait CompletionClient {
    /// Start one completion. Errors returned here happen before any fragment.
    fn stream_complete(&self, request: &CompletionRequest) -> CompletionResult<FragmentStream>;
}

/// Scripted completion client for testing without network access.
pub struct MockCompletionClient {
    fragments: Vec<String>,
    fail_after: Option<usize>,
    refuse: bool,
    calls: Cell<usize>,
    last_request: RefCell<Option<CompletionRequest>>,
}

impl MockCompletionClient {
    /// Stream the given fragments, then end normally.
    pub fn new<S: Into<String>>(fragments: impl IntoIterator<Item = S>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            fail_after: None,
            refuse: false,
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    /// Fail the stream after emitting `n` fragments.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Fail the request before any fragment is produced.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Number of `stream_complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.borrow().clone()
    }
}

impl CompletionClient for MockCompletionClient {
    fn stream_complete(&self, request: &CompletionRequest) -> CompletionResult<FragmentStream> {
        self.calls.set(self.calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());

        if self.refuse {
            return Err(CompletionError::Api {
                status: 429,
                body: "rate limit exceeded".into(),
            });
        }

        let mut items: Vec<CompletionResult<String>> = match self.fail_after {
            Some(n) => self.fragments.iter().take(n).cloned().map(Ok).collect(),
            None => self.fragments.iter().cloned().map(Ok).collect(),
        };
        if self.fail_after.is_some() {
            items.push(Err(CompletionError::Stream("connection reset".into())));
        }

        Ok(FragmentStream::new(items.into_iter()))
    }
}

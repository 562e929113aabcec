//! Runtime configuration.
//!
//! Resolved once at startup from command-line arguments and environment
//! variables, then passed into the chat loop. Nothing reads the environment
//! while a turn is running.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use triage_core::StoreConfig;
use triage_llm::{find_model, ApiKey, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the completion API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Log filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "triage=info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    #[error("Unknown model '{0}': pass --max-tokens to use a model outside the catalog")]
    UnknownModel(String),

    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("Delimiter must be a single ASCII character or \"tab\", got '{0}'")]
    InvalidDelimiter(String),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "triage")]
#[command(about = "Ask a hosted model whether reported symptoms are expected medication side effects")]
pub struct Cli {
    /// Patient episode table (patient_id, date, medicine_leaflet)
    #[arg(
        long,
        env = "TRIAGE_EPISODES",
        default_value = "data/patient_data_with_multiple_diagnoses.csv"
    )]
    pub episodes: PathBuf,

    /// Leaflet side-effects table (medicine_leaflet, side_effects)
    #[arg(
        long,
        env = "TRIAGE_LEAFLETS",
        default_value = "data/medicine_side_effects_single_row.csv"
    )]
    pub leaflets: PathBuf,

    /// Optional patient summary table (patient_id, summary)
    #[arg(long, env = "TRIAGE_SUMMARIES")]
    pub summaries: Option<PathBuf>,

    /// Field delimiter shared by all tables
    #[arg(long, env = "TRIAGE_DELIMITER", default_value = ",")]
    pub delimiter: String,

    /// Hosted model id
    #[arg(long, env = "TRIAGE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Completion budget (defaults to the model's full window)
    #[arg(long, env = "TRIAGE_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "TRIAGE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Whole-request timeout in seconds, covering the full streamed answer.
    /// A stream still running when it expires ends the turn as failed.
    #[arg(long, env = "TRIAGE_TIMEOUT_SECS", default_value_t = 900)]
    pub timeout_secs: u64,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub model: String,
    pub max_tokens: u32,
    pub api_base: String,
    pub timeout_secs: u64,
    pub api_key: ApiKey,
}

impl AppConfig {
    /// Combine parsed arguments with the credential read from the environment.
    pub fn resolve(cli: Cli, api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .map(ApiKey::new)
            .ok_or(ConfigError::MissingApiKey)?;

        let max_tokens = match cli.max_tokens {
            Some(0) => return Err(ConfigError::ZeroMaxTokens),
            Some(n) => n,
            None => find_model(&cli.model)
                .map(|m| m.tokens)
                .ok_or_else(|| ConfigError::UnknownModel(cli.model.clone()))?,
        };

        let mut store = StoreConfig::new(&cli.episodes, &cli.leaflets)
            .with_delimiter(parse_delimiter(&cli.delimiter)?);
        if let Some(summaries) = &cli.summaries {
            store = store.with_summaries(summaries);
        }

        Ok(Self {
            store,
            model: cli.model,
            max_tokens,
            api_base: cli.api_base,
            timeout_secs: cli.timeout_secs,
            api_key,
        })
    }
}

/// Build the log filter from a `RUST_LOG` value, falling back to
/// [`DEFAULT_LOG_FILTER`]. Directives from the environment are used as given.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Parse a delimiter argument into a single byte.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => Err(ConfigError::InvalidDelimiter(other.to_string())),
    }
}

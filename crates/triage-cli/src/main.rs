use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_cli::config::{log_filter, API_KEY_VAR};
use triage_cli::{run_chat, AppConfig, Cli, TriageAssistant};
use triage_core::CsvRecordStore;
use triage_llm::GroqClient;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the transcript.
    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(cli, std::env::var(API_KEY_VAR).ok())?;
    info!(
        model = %config.model,
        max_tokens = config.max_tokens,
        episodes = %config.store.episodes_path.display(),
        leaflets = %config.store.leaflets_path.display(),
        "Configuration resolved"
    );

    let client = GroqClient::new(&config.api_base, config.api_key.clone(), config.timeout_secs)?;
    let store = CsvRecordStore::new(config.store.clone());
    let assistant = TriageAssistant::new(store, client, config.model.clone(), config.max_tokens);

    let stdin = std::io::stdin();
    run_chat(&assistant, stdin.lock(), std::io::stdout())?;

    Ok(())
}

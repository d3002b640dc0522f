use std::sync::Arc;

use moodbuy::{
    app::shell,
    services::AnthropicClient,
    storage::FileStore,
    AppState, Config,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MOODBUY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    // Local state
    let store = FileStore::open(config.resolved_storage_path())?;
    tracing::info!(path = %store.path().display(), "Using local state file");

    // Recommendation client
    let client = AnthropicClient::new(&config)?;

    let mut state = AppState::new(
        Arc::new(client),
        Arc::new(store),
        config.anthropic_api_key.as_deref(),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    shell::run(&mut state, stdin, &mut stdout).await?;

    Ok(())
}

//! Pokedex CLI - explore the Pokemon world from your terminal
//!
//! An interactive prompt that pages through PokeAPI location areas, explores
//! the Pokemon found there and simulates catching them. Responses are cached
//! in memory for the configured TTL.

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pokedex::cache::ResponseCache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::commands::CommandRegistry;
use pokedex::data::PokeApiClient;
use pokedex::repl;
use pokedex::session::Session;

/// Sets up logging to stderr so it never interleaves with REPL output on stdout
fn init_tracing(config: &StartupConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.default_log_filter().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;
    init_tracing(&config);

    let cache = Arc::new(ResponseCache::new(config.cache_ttl)?);
    let client = PokeApiClient::with_cache(config.api_url.as_str(), cache.clone());
    let registry = CommandRegistry::with_builtins();
    let mut session = Session::new();
    info!(api_url = client.base_url(), ttl_secs = config.cache_ttl.as_secs(), "starting pokedex");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let result = repl::run(stdin, &mut stdout, &registry, &mut session, &client).await;

    // Stop the reaper even if the loop failed
    cache.close().await;
    result?;

    Ok(())
}

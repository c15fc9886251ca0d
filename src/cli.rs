//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into a
//! validated [`StartupConfig`].

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::DEFAULT_BASE_URL;

/// How long fetched responses stay cached unless overridden
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache TTL was zero
    #[error("Invalid cache TTL: {0}. The TTL must be at least 1 second")]
    InvalidCacheTtl(u64),

    /// The API URL is not an http(s) URL
    #[error("Invalid API URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidApiUrl(String),
}

/// Pokedex - explore the Pokemon world from your terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Explore PokeAPI location areas and catch Pokemon")]
#[command(version)]
pub struct Cli {
    /// Seconds a fetched response stays cached
    #[arg(long, value_name = "SECONDS", env = "POKEDEX_CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Base URL of the PokeAPI v2 REST API
    #[arg(long, value_name = "URL", env = "POKEDEX_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// TTL for the response cache
    pub cache_ttl: Duration,
    /// Base URL for PokeAPI
    pub api_url: String,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            api_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the TTL is zero or the URL is not http(s)
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_ttl == 0 {
            return Err(CliError::InvalidCacheTtl(cli.cache_ttl));
        }
        if !(cli.api_url.starts_with("http://") || cli.api_url.starts_with("https://")) {
            return Err(CliError::InvalidApiUrl(cli.api_url.clone()));
        }

        Ok(StartupConfig {
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            api_url: cli.api_url.clone(),
            verbose: cli.verbose,
        })
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "pokedex=debug,warn"
        } else {
            "pokedex=warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["pokedex"]).unwrap();
        // Env overrides would make this test depend on the caller's shell
        if std::env::var_os("POKEDEX_CACHE_TTL").is_none() {
            assert_eq!(cli.cache_ttl, DEFAULT_CACHE_TTL_SECS);
        }
        if std::env::var_os("POKEDEX_API_URL").is_none() {
            assert_eq!(cli.api_url, DEFAULT_BASE_URL);
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::parse_from([
            "pokedex",
            "--cache-ttl",
            "30",
            "--api-url",
            "http://localhost:8080/api/v2",
            "-v",
        ]);
        assert_eq!(cli.cache_ttl, 30);
        assert_eq!(cli.api_url, "http://localhost:8080/api/v2");
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_non_numeric_ttl() {
        assert!(Cli::try_parse_from(["pokedex", "--cache-ttl", "soon"]).is_err());
    }

    #[test]
    fn test_startup_config_from_cli() {
        let cli = Cli::parse_from(["pokedex", "--cache-ttl", "60", "--api-url", "https://pokeapi.co/api/v2"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.api_url, "https://pokeapi.co/api/v2");
        assert!(!config.verbose);
    }

    #[test]
    fn test_startup_config_rejects_zero_ttl() {
        let cli = Cli::parse_from(["pokedex", "--cache-ttl", "0"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("Invalid cache TTL"));
    }

    #[test]
    fn test_startup_config_rejects_non_http_url() {
        let cli = Cli::parse_from(["pokedex", "--cache-ttl", "60", "--api-url", "ftp://example.com"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("ftp://example.com"));
    }

    #[test]
    fn test_log_filter_follows_verbose() {
        let quiet = StartupConfig::default();
        let verbose = StartupConfig {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(quiet.default_log_filter(), "pokedex=warn");
        assert_eq!(verbose.default_log_filter(), "pokedex=debug,warn");
    }
}

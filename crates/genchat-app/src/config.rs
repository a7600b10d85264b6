use std::net::SocketAddr;
use std::time::Duration;

use genchat_client::RetryPolicy;

use crate::cli::Cli;

/// Runtime configuration assembled from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_url: String,
    /// None when V0_API_KEY is absent; chat requests then fail fast with 500.
    pub api_key: Option<String>,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        let retry = RetryPolicy {
            max_retries: cli.max_retries,
            attempt_timeout: Duration::from_secs(cli.timeout_secs),
            ..RetryPolicy::default()
        };

        Self {
            bind_addr: cli.bind,
            api_url: cli.api_url.clone(),
            api_key,
            retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cli = Cli::parse_from(["genchat", "--api-key", "   "]);
        let config = AppConfig::from_cli(&cli);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn retry_knobs_flow_into_policy() {
        let cli = Cli::parse_from(["genchat", "--max-retries", "5", "--timeout-secs", "90"]);
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.attempt_timeout, Duration::from_secs(90));
        // backoff and progress cadence keep their defaults
        assert_eq!(config.retry.backoff, genchat_types::RETRY_BACKOFF);
        assert_eq!(config.retry.progress_interval, genchat_types::PROGRESS_INTERVAL);
    }
}

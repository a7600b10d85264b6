use clap::Parser;
use clap_complete::Shell;
use std::net::SocketAddr;

/// CLI arguments for the genchat gateway
#[derive(Parser, Debug)]
#[command(name = "genchat")]
#[command(about = "HTTP gateway bridging chat prompts to the v0 app-generation API")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Address to bind the web server on
    #[arg(long, default_value = "127.0.0.1:3030", value_name = "ADDR")]
    pub bind: SocketAddr,

    /// Base URL of the generation API
    #[arg(
        long,
        env = "V0_API_URL",
        default_value = genchat_client::V0_API_URL,
        value_name = "URL"
    )]
    pub api_url: String,

    /// API key for the generation service. Without it the server still
    /// starts, but every chat request fails with 500.
    #[arg(long, env = "V0_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Additional attempts after the first failed generation call
    #[arg(long, default_value_t = genchat_types::MAX_RETRIES, value_name = "N")]
    pub max_retries: u32,

    /// Per-attempt timeout in seconds for generation calls
    #[arg(long, default_value_t = 600, value_name = "SECS")]
    pub timeout_secs: u64,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub generate: Option<Shell>,
}

use anyhow::Result;
use clap::{CommandFactory, Parser};

use genchat::cli::Cli;
use genchat::config::AppConfig;
use genchat::logging;
use genchat::web::server::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    logging::init_subscriber();

    let config = AppConfig::from_cli(&cli);
    WebServer::new(config).start().await
}

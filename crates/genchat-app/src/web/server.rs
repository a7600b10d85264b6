use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use genchat_client::{GenerationClient, V0GenerationClient};

use crate::config::AppConfig;
use crate::web::routes::{self, AppState};

/// Web server instance
pub struct WebServer {
    config: AppConfig,
}

impl WebServer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        // The client is built once here and injected into the handlers.
        let client: Option<Arc<dyn GenerationClient>> = match &self.config.api_key {
            Some(key) => Some(Arc::new(V0GenerationClient::new(
                key.clone(),
                self.config.api_url.clone(),
            ))),
            None => {
                error!("V0_API_KEY is not set; chat requests will fail with 500");
                None
            }
        };

        let state = AppState::new(client, self.config.retry.clone());
        let app = routes::create_router(state).layer(TraceLayer::new_for_http());

        info!(
            addr = %self.config.bind_addr,
            api_url = %self.config.api_url,
            "gateway listening"
        );

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

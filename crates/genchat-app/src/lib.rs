//! genchat application library
//!
//! HTTP gateway that forwards chat prompts to the v0 app-generation API,
//! wraps the outbound call in a bounded retry/timeout loop, and packages
//! generated files into a ZIP download.

// Re-export workspace crates
pub use genchat_client as client;
pub use genchat_export as export;
pub use genchat_types as types;

// Local modules
pub mod cli;
pub mod config;
pub mod logging;
pub mod web;

// Re-exports from local modules
pub use cli::Cli;
pub use config::AppConfig;
pub use web::server::WebServer;

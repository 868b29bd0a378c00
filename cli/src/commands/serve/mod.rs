//! # HepChat Serve Command
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `hepchat serve` answers chat messages over HTTP and serves a small page
//! that documents the API and lets you try it in a browser.
//!
//! ## Architecture
//!
//! - `config`: merges the `[server]` settings with command-line flags
//! - `handlers`: the request handlers and the JSON error type
//! - `server_logic`: router construction, port selection, graceful shutdown
//!
//! The data files are loaded once, before the port is bound, so a broken
//! intent table stops the command instead of serving errors.
//!
//! ```bash
//! hepchat serve
//! hepchat serve --host 0.0.0.0 --port 9000 --no-cors
//! ```
//!
use crate::bot::chatbot::Chatbot;
use crate::core::config::Config;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::ServeArgs;

/// Merges server settings from the configuration and the command line.
pub mod config;

/// HTTP request handlers.
pub mod handlers;

/// The Axum server, router, and shutdown handling.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Loads the chatbot, then runs the server until it is told to stop.
pub async fn handle_serve(args: ServeArgs, config: &Config) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let server_config = config::ServerConfig::merge(&config.server, &args);
    let chatbot = Chatbot::from_data(&config.data, config.classifier.weights())?;

    server_logic::run_server(server_config, Arc::new(chatbot)).await
}

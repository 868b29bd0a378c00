//! # HepChat Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Combines the `[server]` section of the loaded configuration with the
//! `serve` command-line flags into the `ServerConfig` the server runs with.
//!
//! Precedence, highest first:
//! 1. Command-line flags (`--port`, `--host`, `--no-cors`)
//! 2. Environment (`HEPCHAT_PORT`, `HEPCHAT_HOST`), via clap
//! 3. The `[server]` section of the configuration files
//! 4. Built-in defaults (`127.0.0.1:8000`, CORS on)
//!
//! ```rust
//! let args = ServeArgs::parse();
//! let config = ServerConfig::merge(&cfg.server, &args);
//! println!("Listening on: {}:{}", config.host, config.port);
//! ```
//!
use crate::core::config::ServerSettings;
use clap::Parser;
use std::net::IpAddr;
use tracing::debug;

#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on. The next free port is used if it is taken.
    #[arg(long, short, env = "HEPCHAT_PORT")]
    pub port: Option<u16>,

    /// Address to bind, e.g. 0.0.0.0 to accept outside connections.
    #[arg(long, env = "HEPCHAT_HOST")]
    pub host: Option<IpAddr>,

    /// Disable the permissive CORS layer.
    #[arg(long)]
    pub no_cors: bool,
}

/// Effective settings for one server run.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            enable_cors: settings.enable_cors,
        }
    }
}

impl ServerConfig {
    /// Applies `args` on top of the configured `settings`.
    pub fn merge(settings: &ServerSettings, args: &ServeArgs) -> Self {
        let mut config = Self::from(settings);
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(host) = args.host {
            config.host = host;
        }
        if args.no_cors {
            config.enable_cors = false;
        }
        debug!("Effective server config: {:?}", config);
        config
    }
}

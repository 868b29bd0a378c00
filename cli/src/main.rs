//! # HepChat Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! **DISCLAIMER:** HepChat gives general educational information about
//! Hepatitis B. It is not medical advice.
//!
//! ## Overview
//!
//! This file serves as the main entry point for the HepChat CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the layered configuration once for every command
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - Each subcommand (`serve`, `ask`, `eval`, `intents`) is a variant of the
//!   `Commands` enum, mapped to a handler in `commands::*`
//! - The classifier and its data live in `bot`, the accuracy harness in
//!   `evaluation`
//! - All errors are propagated to this level, printed once, and turned into
//!   exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Start the HTTP chat endpoint
//! hepchat serve --port 8000
//!
//! # Ask one question from the terminal
//! hepchat ask "What is the window period?"
//!
//! # Score the classifier against the benchmark, with debug logging
//! hepchat -vv eval --min-accuracy 0.9
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod bot; // Intent table, classifier, knowledge base, reply text
mod commands; // Subcommand argument parsing and handlers
mod common; // Shared utilities (filesystem I/O)
mod core; // Core infrastructure (errors, config)
mod evaluation; // Benchmark loading, accuracy tallies, CSV report

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "hepchat",
    about = "💬 HepChat: Rule-based Hepatitis B education chatbot",
    long_about = "Answers common Hepatitis B questions by matching them to vetted, canned responses.\n\
                  Serve it over HTTP, ask it from the terminal, or measure its accuracy.\n\
                  Educational information only, not medical advice.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this configuration file instead of the user and project files.
    #[arg(long, global = true, env = "HEPCHAT_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run the HTTP chat endpoint and documentation page.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Answer one question from the terminal.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Measure classifier accuracy against the benchmark.
    #[command(alias = "e")]
    Eval(commands::eval::EvalArgs),
    /// Validate and list the intent table.
    #[command(alias = "i")]
    Intents(commands::intents::IntentsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match crate::core::config::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Serve(args) => commands::serve::handle_serve(args, &config).await,
            Commands::Ask(args) => commands::ask::handle_ask(args, &config).await,
            Commands::Eval(args) => commands::eval::handle_eval(args, &config).await,
            Commands::Intents(args) => commands::intents::handle_intents(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

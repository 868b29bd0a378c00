//! # HepChat Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! Answers one question from the command line, exactly as `POST /chat`
//! would, without starting the server. Handy for trying phrasings while
//! tuning triggers and weights.
//!
//! ```bash
//! hepchat ask "How does Hep B spread?"
//! hepchat ask --json what is the window period
//! hepchat ask --explain "do condoms help"
//! ```
//!
use crate::bot::chatbot::Chatbot;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to answer. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Print the reply as JSON, in the same shape `/chat` returns.
    #[arg(long)]
    pub json: bool,

    /// Also print the score of every intent (a `scores` array with `--json`).
    #[arg(long)]
    pub explain: bool,
}

/// # Handle Ask Command (`handle_ask`)
///
/// Loads the chatbot from the configured data files and prints its reply to
/// the question.
///
/// ## Errors
///
/// Fails only if the data files cannot be loaded; an unmatched question is
/// answered with the fallback response.
pub async fn handle_ask(args: AskArgs, config: &Config) -> Result<()> {
    let question = args.question.join(" ");
    debug!("Answering question: {:?}", question);

    let chatbot = Chatbot::from_data(&config.data, config.classifier.weights())?;
    let reply = chatbot.reply(&question);

    if args.json {
        let value = if args.explain {
            json!({
                "reply": reply.reply,
                "intent": reply.intent,
                "confidence": reply.confidence,
                "scores": chatbot.classifier().scores(&question),
            })
        } else {
            serde_json::to_value(&reply).context("Failed to serialize reply")?
        };
        let text = serde_json::to_string_pretty(&value).context("Failed to serialize reply")?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", reply.reply);
    println!(
        "\n[intent: {}, confidence: {:.0}%]",
        reply.intent,
        reply.confidence * 100.0
    );

    if args.explain {
        let scores = chatbot.classifier().scores(&question);
        let width = scores
            .iter()
            .map(|s| s.intent.len())
            .max()
            .unwrap_or(6)
            .max(6);
        println!("\n{:<width$} | Score", "Intent", width = width);
        println!("{:-<width$}-+-{:-<6}", "", "", width = width);
        for score in &scores {
            println!("{:<width$} | {:.2}", score.intent, score.score, width = width);
        }
    }
    Ok(())
}

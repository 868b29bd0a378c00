//! # HepChat Intents Command
//!
//! File: cli/src/commands/intents.rs
//!
//! ## Overview
//!
//! Loads the intent table (and the knowledge base, when configured) through
//! the same path the server uses, so a successful run means the data files
//! are valid. Then lists every intent in table order, which is also the
//! classifier's tie-break order.
//!
use crate::bot::chatbot::Chatbot;
use crate::bot::intents::IntentDefinition;
use crate::core::config::Config;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct IntentsArgs {
    /// Show every trigger phrase and pattern instead of a summary table.
    #[arg(long, short)]
    pub detailed: bool,
}

/// # Handle Intents Command (`handle_intents`)
pub async fn handle_intents(args: IntentsArgs, config: &Config) -> Result<()> {
    let chatbot = Chatbot::from_data(&config.data, config.classifier.weights())?;
    let table = chatbot.table();

    println!(
        "\nIntent table '{}' is valid.\n",
        config.data.intents.display()
    );

    if args.detailed {
        for intent in table.intents() {
            print_intent_details(intent);
        }
    } else {
        print_intent_table(table.intents());
    }

    let scoring = &config.classifier;
    println!("\nFound {} intent(s).", table.intents().len());
    println!(
        "Scores below {:.2} resolve to 'unknown'; a score of {:.2} is full confidence.",
        scoring.min_score, scoring.confidence_scale
    );
    println!("Use 'hepchat ask <question>' to try one.");
    Ok(())
}

fn print_intent_table(intents: &[IntentDefinition]) {
    let name_width = intents
        .iter()
        .map(|i| i.name().len())
        .max()
        .unwrap_or(10)
        .clamp(10, 30);

    println!(
        "{:<width$} | Triggers | Patterns | Examples | First trigger",
        "Name",
        width = name_width
    );
    println!(
        "{:-<width$}-+----------+----------+----------+-{:-<30}",
        "",
        "",
        width = name_width
    );
    for intent in intents {
        println!(
            "{:<width$} | {:>8} | {:>8} | {:>8} | {}",
            intent.name(),
            intent.triggers().len(),
            intent.patterns().len(),
            intent.examples().len(),
            intent.triggers().first().map(String::as_str).unwrap_or(""),
            width = name_width
        );
    }
}

fn print_intent_details(intent: &IntentDefinition) {
    println!("[{}]", intent.name());
    println!("  Triggers: {}", intent.triggers().join(", "));
    if !intent.patterns().is_empty() {
        println!("  Patterns:");
        for pattern in intent.patterns() {
            println!("    {}", pattern.as_str());
        }
    }
    println!("  Examples: {}", intent.examples().len());
    println!("  Response: {}\n", intent.response());
}

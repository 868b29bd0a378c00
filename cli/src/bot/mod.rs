//! # HepChat Bot
//!
//! File: cli/src/bot/mod.rs
//!
//! ## Overview
//!
//! The question-answering core, independent of any transport:
//! - `text`: normalization and tokenization shared by everything below
//! - `intents`: the validated intent table and its TOML loader
//! - `knowledge`: the optional CSV knowledge base
//! - `classifier`: scores a question against the table
//! - `chatbot`: turns a classification into the reply text
//!
//! Data flows one way: question → `Classifier` → `Classification` →
//! `Chatbot` → `Reply`. Nothing here performs I/O after loading.
//!
pub mod chatbot;
pub mod classifier;
pub mod intents;
pub mod knowledge;
pub mod text;

//! # HepChat Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for HepChat: where the
//! data files live, how the classifier weighs its evidence, where the HTTP
//! server binds, and where evaluation reports go.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence, highest first):
//! 1. Command-line flags (applied by each command, not here)
//! 2. An explicit file passed with `--config` / `HEPCHAT_CONFIG` (replaces 3 and 4)
//! 3. Project-specific `.hepchat.toml` in the current directory or ancestors
//! 4. User-specific `config.toml` in the platform config directory
//! 5. Default values defined in the code
//!
//! Every file is parsed into a `FileConfig` whose fields are all optional,
//! then layered onto the defaults. Relative paths inside a file resolve
//! against the directory that contains the file, and `~` is expanded.
//!
//! ## Examples
//!
//! ```toml
//! [data]
//! intents = "data/intents.toml"
//! knowledge = "data/knowledge.csv"
//! benchmark = "data/benchmark.csv"
//!
//! [classifier]
//! min_score = 2.5
//! confidence_scale = 8.0
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [evaluation]
//! report = "reports/intent_accuracy.csv"
//! min_accuracy = 0.9
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let table_path = &cfg.data.intents;
//! let weights = cfg.classifier.weights();
//! ```
//!
use crate::bot::classifier::ScoringWeights;
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILENAME: &str = ".hepchat.toml";

/// The effective configuration after all layers have been applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    pub classifier: ClassifierConfig,
    pub server: ServerSettings,
    pub evaluation: EvaluationConfig,
}

/// Locations of the static data files.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// Intent table (TOML).
    pub intents: PathBuf,
    /// Optional knowledge base (CSV). Only loaded when configured.
    pub knowledge: Option<PathBuf>,
    /// Benchmark questions for `hepchat eval` (CSV).
    pub benchmark: PathBuf,
}

/// Tunable scoring parameters for the intent classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub phrase_weight: f64,
    pub pattern_weight: f64,
    pub keyword_weight: f64,
    pub example_weight: f64,
    /// Best scores below this resolve to the `unknown` intent.
    pub min_score: f64,
    /// Score that maps to a confidence of 1.0.
    pub confidence_scale: f64,
}

/// Defaults for `hepchat serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

/// Defaults for `hepchat eval`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Where the per-intent CSV report is written.
    pub report: PathBuf,
    /// Fraction in [0, 1]; the eval command fails below it.
    pub min_accuracy: Option<f64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            intents: PathBuf::from("data/intents.toml"),
            knowledge: None,
            benchmark: PathBuf::from("data/benchmark.csv"),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let weights = ScoringWeights::default();
        Self {
            phrase_weight: weights.phrase,
            pattern_weight: weights.pattern,
            keyword_weight: weights.keyword,
            example_weight: weights.example,
            min_score: weights.min_score,
            confidence_scale: weights.confidence_scale,
        }
    }
}

impl ClassifierConfig {
    /// The scoring weights handed to the classifier.
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            phrase: self.phrase_weight,
            pattern: self.pattern_weight,
            keyword: self.keyword_weight,
            example: self.example_weight,
            min_score: self.min_score,
            confidence_scale: self.confidence_scale,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            enable_cors: true,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            report: PathBuf::from("reports/intent_accuracy.csv"),
            min_accuracy: None,
        }
    }
}

// --- File layer ---
// Every field is optional so a file only overrides what it mentions.

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    data: FileDataConfig,
    #[serde(default)]
    classifier: FileClassifierConfig,
    #[serde(default)]
    server: FileServerConfig,
    #[serde(default)]
    evaluation: FileEvaluationConfig,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileDataConfig {
    intents: Option<String>,
    knowledge: Option<String>,
    benchmark: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileClassifierConfig {
    phrase_weight: Option<f64>,
    pattern_weight: Option<f64>,
    keyword_weight: Option<f64>,
    example_weight: Option<f64>,
    min_score: Option<f64>,
    confidence_scale: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileServerConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    enable_cors: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileEvaluationConfig {
    report: Option<String>,
    min_accuracy: Option<f64>,
}

/// # Load Configuration (`load_config`)
///
/// Builds the effective configuration from defaults and config files.
///
/// ## Arguments
///
/// * `explicit`: A config file given on the command line. When present it is
///   the only file consulted and it must exist.
///
/// ## Errors
///
/// Returns an error if a config file cannot be read or parsed, or if the
/// merged configuration fails validation.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(ChatError::Config(format!(
                    "Config file '{}' does not exist.",
                    path.display()
                ))));
            }
            info!("Loading configuration from: {}", path.display());
            apply_file(&mut config, path)?;
        }
        None => {
            if let Some(user_path) = user_config_path() {
                info!("Loading user configuration from: {}", user_path.display());
                apply_file(&mut config, &user_path)?;
            }
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            if let Some(project_path) = find_project_config_path(&current_dir) {
                info!(
                    "Loading project configuration from: {}",
                    project_path.display()
                );
                apply_file(&mut config, &project_path)?;
            }
        }
    }

    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    match ProjectDirs::from("org", "HepChat", "hepchat") {
        Some(proj_dirs) => {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.is_file() {
                Some(config_path)
            } else {
                debug!(
                    "User configuration file not found at {}",
                    config_path.display()
                );
                None
            }
        }
        None => {
            warn!("Could not determine user config directory.");
            None
        }
    }
}

/// Walks from `start` up to the filesystem root looking for `.hepchat.toml`,
/// stopping early at a repository root (a directory containing `.git`).
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return None,
        }
    }
}

fn apply_file(config: &mut Config, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let layer: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    apply_layer(config, layer, base_dir);
    Ok(())
}

fn apply_layer(config: &mut Config, layer: FileConfig, base_dir: &Path) {
    let data = layer.data;
    if let Some(intents) = data.intents {
        config.data.intents = resolve_path(base_dir, &intents);
    }
    if let Some(knowledge) = data.knowledge {
        // An empty string switches an inherited knowledge base off.
        config.data.knowledge = if knowledge.trim().is_empty() {
            None
        } else {
            Some(resolve_path(base_dir, &knowledge))
        };
    }
    if let Some(benchmark) = data.benchmark {
        config.data.benchmark = resolve_path(base_dir, &benchmark);
    }

    let classifier = layer.classifier;
    let target = &mut config.classifier;
    target.phrase_weight = classifier.phrase_weight.unwrap_or(target.phrase_weight);
    target.pattern_weight = classifier.pattern_weight.unwrap_or(target.pattern_weight);
    target.keyword_weight = classifier.keyword_weight.unwrap_or(target.keyword_weight);
    target.example_weight = classifier.example_weight.unwrap_or(target.example_weight);
    target.min_score = classifier.min_score.unwrap_or(target.min_score);
    target.confidence_scale = classifier
        .confidence_scale
        .unwrap_or(target.confidence_scale);

    let server = layer.server;
    config.server.host = server.host.unwrap_or(config.server.host);
    config.server.port = server.port.unwrap_or(config.server.port);
    config.server.enable_cors = server.enable_cors.unwrap_or(config.server.enable_cors);

    let evaluation = layer.evaluation;
    if let Some(report) = evaluation.report {
        config.evaluation.report = resolve_path(base_dir, &report);
    }
    if evaluation.min_accuracy.is_some() {
        config.evaluation.min_accuracy = evaluation.min_accuracy;
    }
}

/// Expands `~` and anchors relative paths at `base_dir`.
fn resolve_path(base_dir: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_relative() {
        base_dir.join(expanded)
    } else {
        expanded
    }
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    let c = &config.classifier;
    let weights = [
        ("phrase_weight", c.phrase_weight),
        ("pattern_weight", c.pattern_weight),
        ("keyword_weight", c.keyword_weight),
        ("example_weight", c.example_weight),
        ("min_score", c.min_score),
    ];
    for (name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!(ChatError::Config(format!(
                "classifier.{} must be a finite, non-negative number (got {}).",
                name, value
            ))));
        }
    }
    if !c.confidence_scale.is_finite() || c.confidence_scale <= 0.0 {
        return Err(anyhow!(ChatError::Config(format!(
            "classifier.confidence_scale must be greater than zero (got {}).",
            c.confidence_scale
        ))));
    }
    if let Some(min) = config.evaluation.min_accuracy {
        if !(0.0..=1.0).contains(&min) {
            return Err(anyhow!(ChatError::Config(format!(
                "evaluation.min_accuracy must be between 0 and 1 (got {}).",
                min
            ))));
        }
    }
    debug!("Configuration validation successful.");
    Ok(())
}

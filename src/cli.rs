//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{DocumentKind, RiskLevel};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Riskboard - fraud-risk analytics for scanned financial documents
///
/// Reads document-analysis records from an uploaded CSV/JSON file or the
/// records API and produces a chart-ready risk report.
///
/// Examples:
///   riskboard --input checks.csv --document-type check
///   riskboard --api-url https://records.example.com --document-type paystub --format json
///   riskboard --input export.json --since 2024-01-01 --risk-level high,medium -o -
///   riskboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Uploaded records file (.csv, or .json API export)
    ///
    /// Takes precedence over --api-url when both are given.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Base URL of the records API
    ///
    /// Can also be set via RISKBOARD_API_URL or .riskboard.toml.
    #[arg(long, value_name = "URL", env = "RISKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Document family the records belong to
    ///
    /// Selects the header aliases and which views are built.
    #[arg(short, long, value_name = "KIND", default_value = "all")]
    pub document_type: DocumentKind,

    /// Output file path for the report ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .riskboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Only include records dated on or after this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Only include records dated on or before this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Only include these risk levels (comma-separated)
    ///
    /// Example: --risk-level high,medium
    #[arg(long, value_name = "LEVELS", value_delimiter = ',')]
    pub risk_level: Option<Vec<RiskLevel>>,

    /// API request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Exit with code 2 when any record is classified HIGH
    #[arg(long)]
    pub fail_on_high: bool,

    /// Generate a default .riskboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref api_url) = self.api_url {
            if self.input.is_none()
                && !api_url.starts_with("http://")
                && !api_url.starts_with("https://")
            {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(format!(
                    "--since ({}) must not be after --until ({})",
                    since, until
                ));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.riskboard.toml` files.

use crate::cli::OutputFormat;
use crate::models::DocumentKind;
use crate::normalize::{Field, FieldAliasTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".riskboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Records API settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Extra header aliases, keyed by document kind then canonical field.
    /// Tried before the built-in aliases.
    #[serde(default)]
    pub aliases: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "riskboard_report.md".to_string()
}

/// Records API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the records API.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Endpoint path per document kind.
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_seconds: default_timeout(),
            endpoints: EndpointConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// API endpoint paths, relative to the base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_check_endpoint")]
    pub check: String,
    #[serde(default = "default_money_order_endpoint")]
    pub money_order: String,
    #[serde(default = "default_paystub_endpoint")]
    pub paystub: String,
    #[serde(default = "default_bank_statement_endpoint")]
    pub bank_statement: String,
    #[serde(default = "default_all_endpoint")]
    pub all: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            check: default_check_endpoint(),
            money_order: default_money_order_endpoint(),
            paystub: default_paystub_endpoint(),
            bank_statement: default_bank_statement_endpoint(),
            all: default_all_endpoint(),
        }
    }
}

impl EndpointConfig {
    /// Endpoint path serving a document kind.
    pub fn for_kind(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Check => &self.check,
            DocumentKind::MoneyOrder => &self.money_order,
            DocumentKind::Paystub => &self.paystub,
            DocumentKind::BankStatement => &self.bank_statement,
            DocumentKind::All => &self.all,
        }
    }
}

fn default_check_endpoint() -> String {
    "/api/checks".to_string()
}

fn default_money_order_endpoint() -> String {
    "/api/money-orders".to_string()
}

fn default_paystub_endpoint() -> String {
    "/api/paystubs".to_string()
}

fn default_bank_statement_endpoint() -> String {
    "/api/bank-statements".to_string()
}

fn default_all_endpoint() -> String {
    "/api/documents".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref api_url) = args.api_url {
            self.source.api_url = Some(api_url.clone());
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Built-in alias table for a kind with configured aliases prepended.
    pub fn alias_table(&self, kind: DocumentKind) -> FieldAliasTable {
        let mut table = FieldAliasTable::for_kind(kind);

        for (section, overrides) in &self.aliases {
            match DocumentKind::from_slug(section) {
                Some(k) if k == kind => {}
                Some(_) => continue,
                None => {
                    warn!("Ignoring [aliases.{}]: unknown document kind", section);
                    continue;
                }
            }

            for (name, extra) in overrides {
                match Field::from_name(name) {
                    Some(field) => {
                        debug!(
                            "[aliases.{}] adds {} header names for {}",
                            section,
                            extra.len(),
                            field
                        );
                        table.prepend(field, extra);
                    }
                    None => warn!(
                        "Ignoring aliases for unknown field '{}' under [aliases.{}]",
                        name, section
                    ),
                }
            }
        }

        table
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.aliases.insert(
            DocumentKind::Check.slug().to_string(),
            BTreeMap::from([("payer".to_string(), vec!["Drawer".to_string()])]),
        );
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "riskboard_report.md");
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.source.timeout_seconds, 30);
        assert!(config.source.api_url.is_none());
        assert_eq!(
            config.source.endpoints.for_kind(DocumentKind::Paystub),
            "/api/paystubs"
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "weekly.json"
format = "json"
verbose = true

[source]
api_url = "https://records.internal"
timeout_seconds = 5

[source.endpoints]
check = "/v2/checks"

[aliases.check]
payer = ["Remitter", "remitter_name"]
riskScore = ["model_score"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "weekly.json");
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(config.general.verbose);
        assert_eq!(
            config.source.api_url.as_deref(),
            Some("https://records.internal")
        );
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.source.endpoints.check, "/v2/checks");
        assert_eq!(config.source.endpoints.all, "/api/documents");

        let table = config.alias_table(DocumentKind::Check);
        assert_eq!(table.aliases(Field::Payer)[0], "Remitter");
        assert_eq!(table.aliases(Field::Payer)[1], "remitter_name");
        assert_eq!(table.aliases(Field::RiskScore)[0], "model_score");
    }

    #[test]
    fn test_unknown_alias_field_is_ignored() {
        let config: Config = toml::from_str(
            r#"
[aliases.paystub]
amount = ["net_pay"]
"#,
        )
        .unwrap();

        assert_eq!(
            config.alias_table(DocumentKind::Paystub),
            FieldAliasTable::for_kind(DocumentKind::Paystub)
        );
    }

    #[test]
    fn test_alias_sections_match_kind_spellings() {
        let config: Config = toml::from_str(
            r#"
[aliases.money-order]
payee = ["beneficiary"]

[aliases.receipts]
payee = ["vendor"]
"#,
        )
        .unwrap();

        let table = config.alias_table(DocumentKind::MoneyOrder);
        assert_eq!(table.aliases(Field::Payee)[0], "beneficiary");

        let checks = config.alias_table(DocumentKind::Check);
        assert!(!checks.aliases(Field::Payee).iter().any(|a| a == "vendor"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[source.endpoints]"));
        assert!(toml_str.contains("[aliases.check]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.source.endpoints.check, "/api/checks");
    }
}

//! Riskboard - fraud-risk analytics for scanned financial documents
//!
//! A CLI tool that loads document-analysis records from an uploaded
//! file or the records API, normalizes their inconsistent fields, and
//! renders a chart-ready aggregate risk report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, unreadable file, API failure, etc.)
//!   2 - HIGH risk records found and --fail-on-high set
//!   3 - No data (empty input, header-only file, or everything filtered out)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod report;
mod source;

use analysis::ViewSet;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{AggregateResult, DocumentKind, RawRow, Report, ReportMetadata};
use normalize::{FieldAliasTable, FieldResolver, RecordFilter};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const EXIT_HIGH_RISK: i32 = 2;
const EXIT_NO_DATA: i32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so `[general] verbose` can pick the log level
    let (config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("Riskboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .riskboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the API URL, endpoints, and extra header aliases.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the load -> normalize -> filter -> aggregate -> render pipeline.
/// Returns the process exit code.
async fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);

    let kind = args.document_type;

    // Step 1: Load raw rows
    let (source, rows) = load_rows(&args, &config, kind).await?;
    info!("Loaded {} rows from {}", rows.len(), source);

    // Steps 2-4: Normalize, filter, aggregate
    let filter = RecordFilter {
        since: args.since,
        until: args.until,
        risk_levels: args.risk_level.clone().unwrap_or_default(),
    };
    let Some(result) = analyze_rows(&rows, kind, config.alias_table(kind), &filter) else {
        warn!("No data available for {}", kind);
        eprintln!("\n⚠️  No data available: the source had no usable records.");
        return Ok(EXIT_NO_DATA);
    };

    let high_risk = result.summary.high_risk_count;

    // Step 5: Render and write
    let report = Report {
        metadata: ReportMetadata {
            source,
            document_kind: kind,
            generated_at: Utc::now(),
            records_loaded: rows.len(),
            records_analyzed: result.summary.total_records,
        },
        result,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let to_stdout = config.general.output == "-";
    write_output(&config.general.output, &output)?;

    if !to_stdout && !args.quiet {
        print_summary(&report.result);
        println!("\n✅ Report saved to: {}", config.general.output);
    }

    let exit_code = exit_code_for(&report.result, args.fail_on_high);
    if exit_code == EXIT_HIGH_RISK {
        eprintln!(
            "\n⛔ {} HIGH risk records found. Failing (exit code {}).",
            high_risk, EXIT_HIGH_RISK
        );
    }

    Ok(exit_code)
}

/// Resolve, filter and aggregate raw rows.
///
/// `None` means no data: an empty or header-only source, or a filter that
/// removed every record.
fn analyze_rows(
    rows: &[RawRow],
    kind: DocumentKind,
    aliases: FieldAliasTable,
    filter: &RecordFilter,
) -> Option<AggregateResult> {
    let records = FieldResolver::new(aliases).resolve_all(rows);
    let records = filter.apply(records);
    if !filter.is_empty() {
        info!("{} of {} records match filters", records.len(), rows.len());
    }

    analysis::aggregate(&records, ViewSet::for_kind(kind))
}

/// Exit code for a populated result.
fn exit_code_for(result: &AggregateResult, fail_on_high: bool) -> i32 {
    if fail_on_high && result.summary.high_risk_count > 0 {
        EXIT_HIGH_RISK
    } else {
        0
    }
}

/// Load rows from the input file, or from the API when no file is given.
async fn load_rows(
    args: &Args,
    config: &Config,
    kind: DocumentKind,
) -> Result<(String, Vec<RawRow>)> {
    if let Some(ref input) = args.input {
        let rows = source::read_rows(input).await?;
        return Ok((input.display().to_string(), rows));
    }

    let api_url = config
        .source
        .api_url
        .as_deref()
        .context("No record source: pass --input or --api-url, or set source.api_url")?;

    let client = source::ApiClient::new(api_url, config.source.timeout_seconds)?;
    let endpoint = config.source.endpoints.for_kind(kind);
    let rows = client.fetch_rows(endpoint).await?;

    Ok((client.endpoint_url(endpoint), rows))
}

/// Write the rendered report to a file, or stdout for "-".
fn write_output(target: &str, content: &str) -> Result<()> {
    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .context("Failed to write report to stdout")?;
        return Ok(());
    }

    std::fs::write(target, content)
        .with_context(|| format!("Failed to write report to {}", target))
}

fn print_summary(result: &AggregateResult) {
    let summary = &result.summary;

    println!("\n📊 Risk Summary:");
    println!("   Records: {}", summary.total_records);
    println!("   Average risk: {}%", summary.average_risk);
    println!(
        "   - 🔴 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
        summary.high_risk_count, summary.medium_risk_count, summary.low_risk_count
    );
    if let Some(repeat) = summary.repeat_offenders {
        println!("   Repeat offenders: {}", repeat);
    }
}

/// Where the effective configuration came from.
///
/// Config is read before the subscriber exists, so the outcome is logged
/// afterwards.
#[derive(Debug)]
enum ConfigOrigin {
    Explicit(PathBuf),
    Default,
    Builtin,
    Unreadable(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::Default => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::Default)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(e))),
    }
}

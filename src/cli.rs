//! Command-line interface for patternscan.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, OutputFormat, DEFAULT_CONFIG_NAMES, DEFAULT_TEMPLATE};
use crate::parser;
use crate::pipeline::{Pipeline, Report, Source};
use crate::report::{self, ReportConfig};
use crate::rules;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Detect functional-style anti-patterns in JavaScript and TypeScript.
///
/// patternscan walks the syntax tree of a source file, reports nodes that
/// match its rules, and reconstructs the offending code for display.
#[derive(Parser)]
#[command(name = "patternscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a source file for patterns
    #[command(visible_alias = "check")]
    Scan(ScanArgs),
    /// Create a configuration file from the default template
    Init(InitArgs),
    /// List the available rules
    Rules,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Source file to scan, or `-` for standard input
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: text, log, html, or json (default: from configuration)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Report verbosity, 0 to 2 (default: from configuration)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbosity: Option<u8>,

    /// Output directory for the html format
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "patternscan.yaml")]
    pub output: PathBuf,
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    parser::init();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Some(format) = &args.format {
        match format.parse::<OutputFormat>() {
            Ok(f) => config.report.format = f,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }
    if let Some(verbosity) = args.verbosity {
        config.report.verbosity = verbosity;
    }
    if let Some(destination) = &args.destination {
        config.report.destination = destination.clone();
    }
    config::validate(&config)?;

    if args.no_color {
        colored::control::set_override(false);
    }

    let rules = rules::from_config(&config.rules);
    tracing::debug!(
        rules = ?rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
        format = %config.report.format,
        "starting scan"
    );

    let source = Source::from_arg(&args.path);
    let report_config = ReportConfig::from_settings(&config.report, source.display_name());
    let pipeline = Pipeline::new()
        .source(source)
        .formatter(report::formatter_for(config.report.format, !args.no_color))
        .registry(rules::registry(&rules))
        .config(report_config);

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(pipeline.run()) {
        Ok(report @ Report::Empty) => {
            println!("{}", report.output());
            Ok(EXIT_SUCCESS)
        }
        Ok(report) => {
            println!("{}", report.output());
            Ok(EXIT_FAILED)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(EXIT_ERROR)
        }
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to enable or tune rules", args.output.display());
    if DEFAULT_CONFIG_NAMES.iter().any(|n| args.output == Path::new(n)) {
        println!("  2. Run: patternscan scan <file>");
    } else {
        println!("  2. Run: patternscan scan <file> --config {}", args.output.display());
    }

    Ok(EXIT_SUCCESS)
}

/// List the stock rules.
pub fn run_rules() -> anyhow::Result<i32> {
    let defaults = rules::from_config(&Default::default());

    println!("Available rules:");
    println!();
    for rule in rules::catalog() {
        let name = if defaults.iter().any(|r| r.name() == rule.name()) {
            rule.name().to_string()
        } else {
            format!("{} (off)", rule.name())
        };
        println!("  {:<24} {:<20} {}", name, rule.tag(), rule.description());
    }

    Ok(EXIT_SUCCESS)
}

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use mezzascan_angular::AngularAnalyzer;
use mezzascan_core::config::Config;
use mezzascan_core::pipeline::ScanPipeline;
use mezzascan_core::types::AggregateReport;
use mezzascan_report::{json, text};

#[derive(Parser)]
#[command(name = "mezzascan")]
#[command(about = "Check Angular workspaces for performance-instrumentation compliance")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a workspace and print the compliance report
    Scan {
        /// Path to the workspace root
        path: PathBuf,
        /// Restrict the scan to files with this base name
        #[arg(short, long)]
        file: Option<String>,
        /// Config file path (defaults to .mezzascan.toml in the workspace)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Scan and exit with code 0 (pass) or 1 (fail)
    Check {
        /// Path to the workspace root
        path: PathBuf,
        /// Restrict the scan to files with this base name
        #[arg(short, long)]
        file: Option<String>,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Create a default .mezzascan.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            path,
            file,
            config,
            format,
            compact,
        } => cmd_scan(&path, file.as_deref(), config.as_deref(), format, compact),
        Commands::Check {
            path,
            file,
            config,
            format,
            compact,
        } => cmd_check(&path, file.as_deref(), config.as_deref(), format, compact),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_scan(
    path: &Path,
    file: Option<&str>,
    config_path: Option<&Path>,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let report = run_scan(path, file, config)?;
    match format {
        OutputFormat::Text => print!("{}", text::format_report(&report)),
        OutputFormat::Json => println!("{}", json::format_report(&report, compact)),
    }
    Ok(())
}

fn cmd_check(
    path: &Path,
    file: Option<&str>,
    config_path: Option<&Path>,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let report = run_scan(path, file, config)?;
    let passed = match format {
        OutputFormat::Text => {
            let (out, passed) = text::format_check(&report);
            print!("{out}");
            passed
        }
        OutputFormat::Json => {
            let (out, passed) = json::format_check(&report, compact);
            println!("{out}");
            passed
        }
    };
    if !passed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".mezzascan.toml");
    if target.exists() && !force {
        anyhow::bail!(".mezzascan.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .mezzascan.toml with default configuration.");
    Ok(())
}

fn load_config(workspace_path: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(workspace_path)),
    }
}

fn run_scan(path: &Path, file: Option<&str>, config: Config) -> Result<AggregateReport> {
    let analyzer = AngularAnalyzer::new(config.instrumentation.clone())
        .context("failed to initialize Angular analyzer")?;
    let pipeline = ScanPipeline::new(vec![Box::new(analyzer)], config);
    match file {
        Some(file_name) => pipeline.scan_file(path, file_name),
        None => pipeline.scan(path),
    }
}

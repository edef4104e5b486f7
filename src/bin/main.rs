//! Cartograph CLI - Scan schema metadata into an evidence graph
//!
//! Usage:
//!   cartograph scan [fixture.json] [--output <dir>] [--sample <n>]
//!
//! Examples:
//!   cartograph scan demos/erp.json
//!   cartograph scan demos/erp.json --output ./out --sample 500
//!   cartograph -vv scan demos/erp.json --no-rules

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cartograph::config::Settings;
use cartograph::metadata::FixtureProvider;
use cartograph::scan::ScanContext;
use cartograph::semantic::{RuleBasedExplainer, SemanticSource};

#[derive(Parser)]
#[command(name = "cartograph")]
#[command(about = "Cartograph - An evidence-based schema relationship and semantic inference engine")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a schema fixture and export the evidence graph
    Scan {
        /// Path to the fixture JSON (falls back to the configured fixture)
        fixture: Option<PathBuf>,

        /// Directory the graph snapshot is written to
        #[arg(short, long, default_value = "./out")]
        output: PathBuf,

        /// Rows sampled per column while building nodes
        #[arg(long)]
        sample: Option<usize>,

        /// Skip rule-based explanations
        #[arg(long)]
        no_rules: bool,

        /// Cancel the scan after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Path to a config file (default: $CARTOGRAPH_CONFIG, then ./cartograph.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan {
            fixture,
            output,
            sample,
            no_rules,
            timeout,
            config,
        } => cmd_scan(fixture, output, sample, no_rules, timeout, config).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cartograph={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn cmd_scan(
    fixture: Option<PathBuf>,
    output: PathBuf,
    sample: Option<usize>,
    no_rules: bool,
    timeout: Option<u64>,
    config: Option<PathBuf>,
) -> ExitCode {
    let settings = match config {
        Some(path) => Settings::from_file(&path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fixture = match fixture {
        Some(path) => path,
        None => match settings.resolved_fixture() {
            Ok(Some(path)) => path,
            Ok(None) => {
                eprintln!("No fixture given and none configured");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let provider = match FixtureProvider::from_file(&fixture) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading fixture '{}': {}", fixture.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut options = settings.scan_options();
    if let Some(n) = sample {
        options.stats_sample_size = n;
    }

    let ctx = ScanContext::with_options(Arc::new(provider), options);

    if let Some(secs) = timeout {
        let token = ctx.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            token.cancel();
        });
    }

    let source: Option<Arc<dyn SemanticSource>> = if !no_rules && settings.semantic.rule_based {
        Some(Arc::new(RuleBasedExplainer::new()))
    } else {
        None
    };

    let report = match ctx.run(source).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Scan error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::create_dir_all(&output) {
        eprintln!("Error creating '{}': {}", output.display(), e);
        return ExitCode::FAILURE;
    }
    let snapshot_path = output.join("schema.json");
    let json = match ctx.graph().to_json().await {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Export error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::write(&snapshot_path, json) {
        eprintln!("Error writing '{}': {}", snapshot_path.display(), e);
        return ExitCode::FAILURE;
    }

    println!("{}", report);
    println!("  graph:          {}", snapshot_path.display());
    ExitCode::SUCCESS
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use portfolio_archive::{HttpFetcher, HttpProbe};
use portfolio_common::load_config;
use portfolio_scout::pipeline::{ScanDeps, Scanner};
use portfolio_scout::report::ReportWriter;
use portfolio_scout::search::{FixtureSource, NoopSource, RecordSource};

/// Exit status when startup fails (config, HTTP client, report directory).
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "portfolio-scout", about = "Discover, verify and health-check portfolio credits")]
struct Cli {
    /// Path to the TOML config
    #[arg(short, long, global = true, default_value = "sourcer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full pipeline: discovery, verification, link health, report
    Scan {
        /// JSON file of search hits to use as the record source
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Link, image and video health check only
    CheckLinks,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(EXIT_FATAL);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("portfolio=info".parse()?))
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let timeout = Duration::from_secs(config.http.timeout_secs);
    let fetcher = HttpFetcher::new(timeout, &config.http.user_agent)?;
    let probe = HttpProbe::new(timeout, &config.http.user_agent)?;
    let writer = ReportWriter::new(&config.report.output_dir)?;

    let source: Box<dyn RecordSource> = match &cli.command {
        Command::Scan { records: Some(path) } => Box::new(FixtureSource::from_json_file(path)?),
        _ => Box::new(NoopSource),
    };

    let scanner = Scanner::new(
        &config,
        ScanDeps {
            source: source.as_ref(),
            fetcher: &fetcher,
            probe: &probe,
        },
    )?;

    let report = match cli.command {
        Command::Scan { records } => {
            if records.is_none() {
                warn!("No record source configured, discovery will find nothing");
            }
            scanner.run_full_scan().await
        }
        Command::CheckLinks => scanner.check_links_only().await,
    };

    let path = writer.save(&report)?;
    println!("{}", report.summary_text(&path));

    let issues = report.total_issues();
    info!(issues, "Done");
    Ok(if issues == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

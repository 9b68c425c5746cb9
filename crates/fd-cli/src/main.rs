//! `feedback-dedup` — find near-duplicate feedback comments in a JSONL export.

mod scan;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fd_core::DedupConfig;
use fd_engine::{AutoReviewer, ConsoleReviewer};

#[derive(Debug, Parser)]
#[command(name = "feedback-dedup", version, about = "Near-duplicate detection for feedback comments")]
struct Cli {
    /// JSON config file; defaults apply to anything it leaves out
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed every record's comment through the detector, reporting duplicates
    /// as JSON lines on stdout
    Scan {
        /// JSONL file of feedback records
        input: PathBuf,

        /// Decision cache file (overrides the config)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Treat every ambiguous pair as different, without prompting
        #[arg(long, conflicts_with = "assume_yes")]
        assume_no: bool,

        /// Treat every ambiguous pair as the same, without prompting
        #[arg(long)]
        assume_yes: bool,

        /// Report best candidates and scores; never prompt or write the cache
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the normalized form, buckets and fingerprint of a text
    Fingerprint { text: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => DedupConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DedupConfig::default(),
    };

    match cli.command {
        Command::Scan { input, cache, assume_no, assume_yes, dry_run } => {
            if let Some(cache) = cache {
                config.cache.path = cache;
            }
            let content = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;
            let mut out = std::io::stdout().lock();

            let summary = if assume_no || assume_yes {
                let reviewer = AutoReviewer::new(assume_yes);
                scan::scan_records(&config, &content, reviewer, dry_run, &mut out).await?
            } else {
                let reviewer = ConsoleReviewer::stdio();
                scan::scan_records(&config, &content, reviewer, dry_run, &mut out).await?
            };
            tracing::info!(
                records = summary.records,
                duplicates = summary.duplicates,
                reviewed = summary.reviewed,
                indexed = summary.corpus.documents,
                short = summary.corpus.short,
                medium = summary.corpus.medium,
                long = summary.corpus.long,
                "scan finished"
            );
            Ok(())
        }
        Command::Fingerprint { text } => {
            let report = scan::inspect(&text);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

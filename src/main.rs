//! # CTDL Harvester CLI
//!
//! Command-line interface for the harvesting pipeline.
//!
//! ## Subcommands
//!
//! - `crawl`: keyword-filtered site crawl, persisting matched links
//! - `harvest`: combine matched pages into one text corpus
//! - `extract`: turn a corpus into CTDL support-service records
//! - `publish`: post an api-mode envelope to the registry
//! - `run`: the full pipeline end to end
//!
//! Each stage reads its input from the files the previous stage wrote
//! under the output directory, so a failed run can be resumed at the
//! stage that failed.

mod telemetry;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use ctdl_harvester::config::{self, AppConfig};
use ctdl_harvester::crawler::{self, KeywordMatch, SnapshotWriter};
use ctdl_harvester::extract::{
    self, ExtractMode, GeminiGenerator, RetryPolicy, TokioSleeper,
};
use ctdl_harvester::fetch::HttpFetcher;
use ctdl_harvester::gemini::Client;
use ctdl_harvester::harvester;
use ctdl_harvester::output;
use ctdl_harvester::publish::{Publisher, write_publish_log};

/// Snapshot of matched links written by the crawl stage
const MATCHES_FILE: &str = "relevant_links.json";
/// Combined corpus written by the harvest stage
const CORPUS_FILE: &str = "scraped_content.txt";
/// Raw api-mode publish envelope
const API_OUTPUT_FILE: &str = "support_services_api.json";
/// Raw bulk-mode record array
const BULK_OUTPUT_FILE: &str = "support_services_but.json";
/// Bulk records that survived validation
const FILTERED_FILE: &str = "filtered_output.json";
/// Bulk-upload CSV derived from the validated records
const CSV_FILE: &str = "support_services_but.csv";

#[derive(Parser)]
#[command(author, version, about = "Harvest support-service pages into CTDL records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a site for pages matching the keyword list
    Crawl(CrawlArgs),

    /// Combine matched pages into one text corpus
    Harvest(HarvestArgs),

    /// Extract CTDL support-service records from a corpus
    Extract(ExtractArgs),

    /// Publish an api-mode envelope to the registry
    Publish(PublishArgs),

    /// Run crawl, harvest, and extract end to end
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Root URL to crawl
    #[arg(required = true)]
    url: String,

    /// Crawl depth
    #[arg(short, long, default_value = "2")]
    depth: u32,

    /// Path to the keyword list, one keyword per line
    #[arg(short, long)]
    keywords: PathBuf,

    /// Directory for pipeline output files
    #[arg(short, long, default_value = "uploads")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct HarvestArgs {
    /// Matched-links file (defaults to relevant_links.json in the
    /// output directory)
    #[arg(short, long)]
    matches: Option<PathBuf>,

    /// Directory for pipeline output files
    #[arg(short, long, default_value = "uploads")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Corpus file (defaults to scraped_content.txt in the output
    /// directory)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Output shape: "api" for a publish envelope, "bulk" for the
    /// CSV-template record array
    #[arg(short, long, default_value = "api")]
    mode: ExtractMode,

    /// Gemini model to use
    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Total generation attempts before giving up on rate limits
    #[arg(long, default_value = "3")]
    retries: u32,

    /// Backoff delay before the first attempt, in seconds
    #[arg(long, default_value = "1")]
    initial_delay: u64,

    /// Publish the api-mode envelope after extraction
    #[arg(short, long)]
    publish: bool,

    /// Directory for pipeline output files (overrides UPLOAD_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Envelope file (defaults to support_services_api.json in the
    /// output directory)
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Directory for pipeline output files (overrides UPLOAD_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Root URL to crawl
    #[arg(required = true)]
    url: String,

    /// Crawl depth
    #[arg(short, long, default_value = "2")]
    depth: u32,

    /// Path to the keyword list, one keyword per line
    #[arg(short, long)]
    keywords: PathBuf,

    /// Output shape: "api" or "bulk"
    #[arg(short, long, default_value = "api")]
    mode: ExtractMode,

    /// Gemini model to use
    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Total generation attempts before giving up on rate limits
    #[arg(long, default_value = "3")]
    retries: u32,

    /// Backoff delay before the first attempt, in seconds
    #[arg(long, default_value = "1")]
    initial_delay: u64,

    /// Publish the api-mode envelope after extraction
    #[arg(short, long)]
    publish: bool,

    /// Directory for pipeline output files (overrides UPLOAD_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing_subscriber();

    match cli.command {
        Some(Commands::Crawl(args)) => {
            crawl_command(args).await?;
        }
        Some(Commands::Harvest(args)) => {
            harvest_command(args).await?;
        }
        Some(Commands::Extract(args)) => {
            extract_command(args).await?;
        }
        Some(Commands::Publish(args)) => {
            publish_command(args).await?;
        }
        Some(Commands::Run(args)) => {
            run_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["--help"]);
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message(message);
    bar
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let matches = crawl_stage(&fetcher, &args.url, args.depth, &args.keywords, &args.output_dir)
        .await?;

    println!(
        "Matched {} pages; links saved to {}",
        matches.len(),
        args.output_dir.join(MATCHES_FILE).display()
    );
    Ok(())
}

async fn crawl_stage(
    fetcher: &HttpFetcher,
    url: &str,
    depth: u32,
    keywords_path: &Path,
    output_dir: &Path,
) -> anyhow::Result<Vec<KeywordMatch>> {
    let keywords = config::load_keywords(keywords_path).context("crawl stage failed")?;
    tokio::fs::create_dir_all(output_dir)
        .await
        .context("crawl stage failed")?;

    let seeds = crawler::expand_subdomains(url);
    println!("Crawling {} seed URLs derived from {}...", seeds.len(), url);

    let crawl_config = crawler::CrawlerConfig::builder()
        .max_depth(depth)
        .keywords(keywords)
        .snapshot_path(output_dir.join(MATCHES_FILE))
        .build();

    let bar = spinner("Crawling...");
    let matches = crawler::crawl_seeds(fetcher, &seeds, &crawl_config)
        .await
        .map_err(ctdl_harvester::Error::from)
        .context("crawl stage failed")?;
    bar.finish_with_message("Crawl complete");

    Ok(matches)
}

#[instrument]
async fn harvest_command(args: HarvestArgs) -> anyhow::Result<()> {
    let matches_path = args
        .matches
        .unwrap_or_else(|| args.output_dir.join(MATCHES_FILE));
    let matches = SnapshotWriter::load(&matches_path)
        .await
        .map_err(ctdl_harvester::Error::from)
        .context("harvest stage failed")?;

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let corpus_path = harvest_stage(&fetcher, &matches, &args.output_dir).await?;

    println!("Corpus saved to {}", corpus_path.display());
    Ok(())
}

async fn harvest_stage(
    fetcher: &HttpFetcher,
    matches: &[KeywordMatch],
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let bar = spinner("Harvesting matched pages...");
    let corpus = harvester::harvest(fetcher, matches).await;
    bar.finish_with_message("Harvest complete");

    tokio::fs::create_dir_all(output_dir)
        .await
        .context("harvest stage failed")?;
    let corpus_path = output_dir.join(CORPUS_FILE);
    tokio::fs::write(&corpus_path, &corpus)
        .await
        .context("harvest stage failed")?;

    Ok(corpus_path)
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let mut app_config = AppConfig::from_env().context("extract stage failed")?;
    if let Some(dir) = args.output_dir {
        app_config.output_dir = dir;
    }

    let corpus_path = args
        .corpus
        .unwrap_or_else(|| app_config.output_dir.join(CORPUS_FILE));
    let corpus = tokio::fs::read_to_string(&corpus_path)
        .await
        .with_context(|| format!("failed to read corpus {}", corpus_path.display()))?;

    let generated = extract_stage(
        &app_config,
        &corpus,
        args.mode,
        &args.model,
        args.retries,
        args.initial_delay,
    )
    .await?;

    finalize_output(&app_config, &generated, args.mode).await?;

    if args.publish {
        if args.mode != ExtractMode::Api {
            return Err(anyhow!("only api-mode output can be published"));
        }
        publish_stage(&app_config, &generated).await?;
    }

    Ok(())
}

async fn extract_stage(
    app_config: &AppConfig,
    corpus: &str,
    mode: ExtractMode,
    model: &str,
    retries: u32,
    initial_delay: u64,
) -> anyhow::Result<Value> {
    let client = Client::with_api_key(&app_config.gemini_api_key);
    let generator = GeminiGenerator::new(client, model);
    let policy = RetryPolicy {
        max_attempts: retries,
        initial_delay: Duration::from_secs(initial_delay),
        multiplier: 2,
    };

    let bar = spinner("Extracting support services...");
    let generated = extract::extract_services(
        &generator,
        &TokioSleeper,
        &policy,
        corpus,
        mode,
        app_config,
    )
    .await
    .context("extract stage failed")?;
    bar.finish_with_message("Extraction complete");

    Ok(generated)
}

/// Write the generated records out and, in bulk mode, run validation
/// and CSV conversion on them.
async fn finalize_output(
    app_config: &AppConfig,
    generated: &Value,
    mode: ExtractMode,
) -> anyhow::Result<()> {
    let output_dir = &app_config.output_dir;
    tokio::fs::create_dir_all(output_dir).await?;

    let raw_file = match mode {
        ExtractMode::Api => API_OUTPUT_FILE,
        ExtractMode::Bulk => BULK_OUTPUT_FILE,
    };
    let raw_path = output_dir.join(raw_file);
    tokio::fs::write(&raw_path, serde_json::to_vec_pretty(generated)?).await?;
    println!("Generated records saved to {}", raw_path.display());

    if mode == ExtractMode::Bulk {
        let records = match generated {
            Value::Array(items) => items.clone(),
            single => vec![single.clone()],
        };

        let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
        let bar = spinner("Validating records...");
        let valid = output::validate_records(&fetcher, &records).await;
        bar.finish_with_message("Validation complete");

        let filtered_path = output_dir.join(FILTERED_FILE);
        tokio::fs::write(&filtered_path, serde_json::to_vec_pretty(&valid)?).await?;
        println!(
            "{} of {} records valid; saved to {}",
            valid.len(),
            records.len(),
            filtered_path.display()
        );

        let csv_path = output_dir.join(CSV_FILE);
        let file = std::fs::File::create(&csv_path)?;
        output::write_bulk_csv(&Value::Array(valid), file).context("CSV conversion failed")?;
        println!("Bulk-upload CSV saved to {}", csv_path.display());
    }

    Ok(())
}

#[instrument]
async fn publish_command(args: PublishArgs) -> anyhow::Result<()> {
    let mut app_config = AppConfig::from_env().context("publish stage failed")?;
    if let Some(dir) = args.output_dir {
        app_config.output_dir = dir;
    }

    let payload_path = args
        .payload
        .unwrap_or_else(|| app_config.output_dir.join(API_OUTPUT_FILE));
    let payload = tokio::fs::read_to_string(&payload_path)
        .await
        .with_context(|| format!("failed to read payload {}", payload_path.display()))?;
    let payload: Value = serde_json::from_str(&payload)
        .with_context(|| format!("payload {} is not valid JSON", payload_path.display()))?;

    publish_stage(&app_config, &payload).await
}

async fn publish_stage(app_config: &AppConfig, payload: &Value) -> anyhow::Result<()> {
    let publisher = Publisher::from_config(app_config).context("publish stage failed")?;

    let bar = spinner("Publishing to the registry...");
    let log = publisher
        .publish(payload)
        .await
        .context("publish stage failed")?;
    bar.finish_with_message("Publish complete");

    write_publish_log(&app_config.output_dir, &log)
        .await
        .context("publish stage failed")?;
    println!(
        "Publish log saved to {}",
        app_config.output_dir.join("publish_log.json").display()
    );
    Ok(())
}

#[instrument]
async fn run_command(args: RunArgs) -> anyhow::Result<()> {
    let mut app_config = AppConfig::from_env().context("run failed")?;
    if let Some(dir) = args.output_dir {
        app_config.output_dir = dir;
    }

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;

    let matches = crawl_stage(
        &fetcher,
        &args.url,
        args.depth,
        &args.keywords,
        &app_config.output_dir,
    )
    .await?;
    println!("Matched {} pages", matches.len());

    harvest_stage(&fetcher, &matches, &app_config.output_dir).await?;
    let corpus_path = app_config.output_dir.join(CORPUS_FILE);
    let corpus = tokio::fs::read_to_string(&corpus_path).await?;

    let generated = extract_stage(
        &app_config,
        &corpus,
        args.mode,
        &args.model,
        args.retries,
        args.initial_delay,
    )
    .await?;

    finalize_output(&app_config, &generated, args.mode).await?;

    if args.publish {
        if args.mode != ExtractMode::Api {
            return Err(anyhow!("only api-mode output can be published"));
        }
        publish_stage(&app_config, &generated).await?;
    }

    Ok(())
}

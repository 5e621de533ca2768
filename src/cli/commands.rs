//! CLI commands implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::catalog;
use crate::config::Settings;
use crate::error::ScrapeError;
use crate::listing::{ListingResolver, ResolveOptions, StrategyOrder};
use crate::normalize::Normalizer;
use crate::output;
use crate::parser::ProductParser;
use crate::scrapers::HttpClient;

#[derive(Parser)]
#[command(name = "alkosto")]
#[command(about = "Alkosto catalog extraction tool")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a category and write the records to a file
    Scrape {
        /// Category name (see `categories`)
        category: String,
        /// Target number of products
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output path; the extension picks the format (.json/.jsonl/.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Try the HTML listing strategies before the search index
        #[arg(long)]
        html_first: bool,
        /// Diagnostic: keep URLs that fail the category URL patterns
        #[arg(long)]
        no_category_filter: bool,
    },

    /// List supported categories
    Categories,

    /// Summarize the most recent output file
    Report {
        /// Directory holding previous dumps
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Scrape {
            category,
            limit,
            output,
            html_first,
            no_category_filter,
        } => {
            scrape_command(
                &settings,
                &category,
                limit,
                output,
                html_first,
                no_category_filter,
            )
            .await
        }
        Commands::Categories => {
            categories_command();
            Ok(())
        }
        Commands::Report { dir } => report_command(&dir),
    }
}

async fn scrape_command(
    settings: &Settings,
    category_name: &str,
    limit: usize,
    output_path: Option<PathBuf>,
    html_first: bool,
    no_category_filter: bool,
) -> anyhow::Result<()> {
    let category = catalog::category_config(category_name)
        .ok_or_else(|| ScrapeError::UnknownCategory(category_name.to_string()))?;

    let limit = limit.max(1);
    let output_path = output_path.unwrap_or_else(|| {
        output::default_output_path(Path::new("data"), &category.name, Utc::now())
    });

    let client = HttpClient::new(settings);
    let options = ResolveOptions {
        order: if html_first {
            StrategyOrder::HtmlFirst
        } else {
            StrategyOrder::ApiFirst
        },
        use_category_filter: !no_category_filter,
    };

    println!(
        "{} {} (up to {} products)",
        style("Resolving listings for").bold(),
        style(&category.name).cyan(),
        limit
    );

    let listing = ListingResolver::new(&client, category, settings)
        .with_options(options)
        .resolve(limit)
        .await;

    if listing.is_empty() {
        output::write_records(&output_path, &[])?;
        bail!(
            "no products found for '{}'; wrote empty output to {}",
            category.name,
            output_path.display()
        );
    }

    let parser = ProductParser::new(settings);
    let progress = ProgressBar::new(listing.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut raw_records = Vec::new();
    let mut fetch_failures = 0usize;
    for candidate in listing.into_entries() {
        progress.set_message(tail_of(&candidate.url));
        let record = match &candidate.hit {
            // search index hits carry enough fields to skip the page fetch
            Some(hit) => parser.from_search_hit(hit, &category.name),
            None => match client.get_text_with_retry(&candidate.url).await {
                Ok(html) => parser.parse_html(&html, &candidate.url, &category.name),
                Err(err) => {
                    // one bad product never aborts the batch
                    warn!("skipping {}: {}", candidate.url, err);
                    fetch_failures += 1;
                    progress.inc(1);
                    continue;
                }
            },
        };
        raw_records.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let extracted = raw_records.len();
    let normalizer = Normalizer::new(settings.rules.clone());
    let (records, report) = normalizer.normalize_batch(raw_records);
    output::write_records(&output_path, &records)?;

    println!(
        "{} {} extracted, {} fetch failures",
        style("Done:").bold().green(),
        extracted,
        fetch_failures
    );
    println!(
        "  {} valid, {} rejected, {} warnings",
        style(report.accepted).green(),
        style(report.rejected).red(),
        style(report.warnings).yellow()
    );
    println!("  wrote {}", style(output_path.display()).bold());

    Ok(())
}

fn categories_command() {
    println!("{}", style("Supported categories:").bold());
    for category in catalog::all_categories() {
        println!(
            "  {:<14} ~{:<4} products  {}",
            style(&category.name).cyan(),
            category.expected_catalog_size,
            category.listing_url
        );
    }
}

fn report_command(dir: &Path) -> anyhow::Result<()> {
    let Some(path) = output::latest_file(dir) else {
        bail!("no output files found under {}", dir.display());
    };
    let document =
        output::load_json(&path).with_context(|| format!("reading {}", path.display()))?;

    println!(
        "{} {}",
        style("Most recent dump:").bold(),
        path.display()
    );
    println!(
        "  source {}, extracted {}, {} records",
        document.metadata.source,
        document.metadata.extracted_at.format("%Y-%m-%d %H:%M UTC"),
        document.metadata.total_records
    );
    for (category, stats) in &document.metadata.categories {
        let brands = stats
            .top_brands
            .iter()
            .map(|b| format!("{} ({})", b.brand, b.count))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<14} {} products, prices ${} - ${} (mean ${:.0}), {} with image",
            style(category).cyan(),
            stats.count,
            stats.price_min,
            stats.price_max,
            stats.price_mean,
            stats.with_image
        );
        if !brands.is_empty() {
            println!("  {:<14} top brands: {}", "", brands);
        }
    }
    Ok(())
}

/// Trailing path segment of a URL, for progress display.
fn tail_of(url: &str) -> String {
    url.rsplit('/')
        .find(|part| !part.is_empty())
        .unwrap_or(url)
        .chars()
        .take(40)
        .collect()
}

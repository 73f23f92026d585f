//! Sitegraph main entry point
//!
//! This is the command-line interface for the Sitegraph link graph crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sitegraph::config::{load_config_or_default, validate, Config};
use sitegraph::crawler::CrawlReport;
use sitegraph::output::{prepare_output_dir, write_sitemap_xml, LinkDiagram};
use sitegraph::storage::{NewSummary, SqliteStore, SummaryStore};
use sitegraph::url::output_dir_for;
use tracing_subscriber::EnvFilter;

/// Sitegraph: a same-domain link graph crawler
///
/// Sitegraph crawls a website from a seed URL up to a bounded depth, writes
/// the discovered link graph as an XML sitemap (and optionally an SVG
/// diagram), and records a summary of the crawl in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "A same-domain link graph crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// SQLite database file name, created inside the site's output directory
    #[arg(value_name = "DB_FILE")]
    db_file: PathBuf,

    /// Maximum link distance from the seed URL (overrides the config file)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory under which the per-site output directory is created
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip rendering the SVG link diagram
    #[arg(long)]
    no_diagram: bool,

    /// Show the crawls recorded in the database and exit
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    let config = apply_overrides(config, &cli)?;

    if cli.stats {
        handle_stats(&config, &cli)
    } else {
        handle_crawl(&config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(mut config: Config, cli: &Cli) -> anyhow::Result<Config> {
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if cli.no_diagram {
        config.output.render_diagram = false;
    }

    validate(&config).context("Invalid configuration after applying command-line options")?;
    Ok(config)
}

/// Handles the --stats mode: lists the crawls recorded in the database
fn handle_stats(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let db_path = output_dir_for(&config.output.directory, &cli.url).join(&cli.db_file);
    if !db_path.exists() {
        println!("No database at {}", db_path.display());
        return Ok(());
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let records = store.list_summaries()?;

    println!("Database: {}\n", db_path.display());
    if records.is_empty() {
        println!("No crawls recorded");
        return Ok(());
    }

    for record in &records {
        println!(
            "#{:<4} {}  {:>8.2}s  {:>6} links  {}  ({})",
            record.id,
            record.url,
            record.time_consumed,
            record.links_found,
            record.result_filename,
            record.created_at
        );
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (max depth {}, {} concurrent fetches)",
        cli.url,
        config.crawler.max_depth,
        config.crawler.max_concurrent_fetches
    );

    let report = match sitegraph::crawl_with_config(&cli.url, config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Crawl completed: {} URLs visited in {:.2}s",
        report.visited_count,
        report.elapsed_seconds()
    );

    let output_dir = prepare_output_dir(&config.output.directory, &cli.url)?;
    let sitemap_path = write_outputs(&report, config, &output_dir)?;

    let db_path = output_dir.join(&cli.db_file);
    let mut store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let id = store.insert_summary(&NewSummary::from_report(&report, &sitemap_path))?;
    tracing::debug!("Recorded crawl summary #{} in {}", id, db_path.display());

    print_summary(&report, &sitemap_path, &db_path);

    Ok(())
}

/// Writes the sitemap and (unless disabled) the link diagram
///
/// Returns the path of the written sitemap.
fn write_outputs(report: &CrawlReport, config: &Config, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let sitemap_path = output_dir.join(&config.output.sitemap_file);
    write_sitemap_xml(&report.graph, &sitemap_path)
        .with_context(|| format!("Failed to write sitemap {}", sitemap_path.display()))?;
    tracing::info!("Sitemap written to {}", sitemap_path.display());

    if config.output.render_diagram {
        let diagram_path = output_dir.join(&config.output.diagram_file);
        LinkDiagram::from_graph(&report.graph)
            .write_svg(&diagram_path)
            .with_context(|| format!("Failed to write diagram {}", diagram_path.display()))?;
        tracing::info!("Link diagram written to {}", diagram_path.display());
    }

    Ok(sitemap_path)
}

fn print_summary(report: &CrawlReport, sitemap_path: &Path, db_path: &Path) {
    println!("Crawled:       {}", report.seed);
    println!("Time consumed: {:.2}s", report.elapsed_seconds());
    println!("URLs visited:  {}", report.visited_count);
    println!("Pages fetched: {}", report.pages_fetched());
    println!("Failed:        {}", report.failed_count());
    println!("Sitemap:       {}", sitemap_path.display());
    println!("Database:      {}", db_path.display());
}

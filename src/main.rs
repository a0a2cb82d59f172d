//! CLI entry point for cruise_signal.
//!
//! Reads already-fetched analytics API responses from JSON files, runs the
//! aggregators over them and prints display-ready summaries. Thumbnails are
//! the only thing looked up over the network.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cruise_signal::analyzers::labels::titleize_slug;
use cruise_signal::analyzers::rank::{RankKind, rank_entities};
use cruise_signal::analyzers::report::{ReportInput, build_report};
use cruise_signal::analyzers::series::infer_series_keys;
use cruise_signal::analyzers::types::{RankRow, decode_list};
use cruise_signal::config::Config;
use cruise_signal::fetch::BasicClient;
use cruise_signal::output::{append_rankings, print_json, print_pretty};
use cruise_signal::thumbnail::{Thumbnail, ThumbnailResolver, WikipediaSource};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cruise_signal")]
#[command(about = "Summarize cruise sentiment signal for display", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a full entity report from saved API responses
    Report {
        /// Entity summary JSON (flat or nested under `sentiment`)
        #[arg(long)]
        summary: PathBuf,

        /// Theme list JSON
        #[arg(long)]
        themes: Option<PathBuf>,

        /// Comment feed JSON
        #[arg(long)]
        feed: Option<PathBuf>,

        /// Trend series JSON
        #[arg(long)]
        trend: Option<PathBuf>,

        /// Cruise lines breakdown JSON
        #[arg(long)]
        lines: Option<PathBuf>,

        /// Ships breakdown JSON
        #[arg(long)]
        ships: Option<PathBuf>,

        /// Per-sub-entity severity/sentiment rows to rank
        #[arg(long)]
        ranks: Option<PathBuf>,

        /// Only keep themes whose label contains this text
        #[arg(long)]
        theme_query: Option<String>,

        /// Mention count from the entity listing, used when the summary has none
        #[arg(long)]
        listing_mentions: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Rank sub-entities by composite severity/sentiment score
    Rank {
        /// JSON array of rows with an id, mentions, avg_sev and avg_sent
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Which end of the ranking to keep: best or worst
        #[arg(short, long, default_value = "best")]
        kind: RankKind,

        /// Number of rows to keep
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// CSV file to append the ranking to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Infer the axis and series keys of a trend series
    Trend {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Look up thumbnails for display titles
    Thumbnail {
        #[arg(value_name = "TITLE", required = true)]
        titles: Vec<String>,

        /// Treat titles as slugs ("wonder-of-the-seas") and titleize them first
        #[arg(long, default_value_t = false)]
        slug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = Path::new(&config.log_file_path);
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("cruise_signal.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            summary,
            themes,
            feed,
            trend,
            lines,
            ships,
            ranks,
            theme_query,
            listing_mentions,
            pretty,
        } => {
            let mut input = ReportInput::from_values(
                &load_json(Some(&summary))?,
                &load_json(themes.as_deref())?,
                &load_json(feed.as_deref())?,
                &load_json(trend.as_deref())?,
                &load_json(lines.as_deref())?,
                &load_json(ships.as_deref())?,
                &load_json(ranks.as_deref())?,
            );
            input.theme_query = theme_query;
            input.listing_mentions = listing_mentions;

            info!(
                themes = input.themes.len(),
                feed = input.feed.len(),
                trend = input.trend.len(),
                ranks = input.ranks.len(),
                "Records loaded"
            );

            let report = build_report(&input, &config.analysis);
            print_pretty(&report);
            print_json(&report, pretty)?;
        }
        Commands::Rank {
            file,
            kind,
            top_k,
            csv,
        } => {
            let rows: Vec<RankRow> = decode_list(&load_json(Some(&file))?);
            let dropped = rows.iter().filter(|r| r.id().is_none()).count();
            if dropped > 0 {
                warn!(dropped, "Rows without an identifier were skipped");
            }

            let top_k = top_k.unwrap_or(config.analysis.rank_top_k);
            let ranked = rank_entities(&rows, kind, top_k, &config.analysis.rank_weights);
            info!(kind = kind.as_str(), top_k, ranked = ranked.len(), "Ranking complete");

            if let Some(path) = csv {
                append_rankings(&path, kind, &ranked)?;
                info!(path = %path, "Ranking appended to CSV");
            }
            print_json(&ranked, true)?;
        }
        Commands::Trend { file } => {
            let rows = load_json(Some(&file))?;
            let rows = rows.as_array().map(Vec::as_slice).unwrap_or_default();
            let keys = infer_series_keys(rows);
            info!(axis = %keys.axis, series = ?keys.series, "Trend keys inferred");
            print_json(&keys, true)?;
        }
        Commands::Thumbnail { titles, slug } => {
            let titles: Vec<String> = if slug {
                titles.iter().map(|t| titleize_slug(t)).collect()
            } else {
                titles
            };

            let client = BasicClient::with_timeout(config.thumbnail_timeout)?;
            let source = WikipediaSource::with_base_url(client, &config.thumbnail_base_url);
            let resolver = Arc::new(ThumbnailResolver::new(source));

            let thumbs = resolve_titles(resolver, titles).await;
            print_json(&thumbs, true)?;
        }
    }

    Ok(())
}

/// Reads and parses a JSON file. `None` yields `Value::Null`, which every
/// decoder treats as "no data".
fn load_json(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };

    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON in {}", path.display()))
}

/// Resolves every title concurrently through one shared resolver.
#[tracing::instrument(skip(resolver), fields(count = titles.len()))]
async fn resolve_titles(
    resolver: Arc<ThumbnailResolver<WikipediaSource<BasicClient>>>,
    titles: Vec<String>,
) -> Vec<Thumbnail> {
    let mut tasks = vec![];

    for title in &titles {
        let resolver = resolver.clone();
        let title = title.clone();
        let span = tracing::info_span!("resolve_thumbnail", title = %title);

        tasks.push(tokio::spawn(
            async move { resolver.resolve(&title).await }.instrument(span),
        ));
    }

    let mut thumbs = Vec::with_capacity(tasks.len());
    for (task, title) in tasks.into_iter().zip(&titles) {
        match task.await {
            Ok(thumb) => thumbs.push(thumb),
            Err(e) => {
                error!(title = %title, error = %e, "Thumbnail task failed");
                thumbs.push(Thumbnail::empty(title));
            }
        }
    }

    let found = thumbs.iter().filter(|t| t.thumb.is_some()).count();
    info!(found, total = thumbs.len(), "Thumbnail lookups finished");
    thumbs
}

//! Output formatting and persistence for reports and rankings.
//!
//! Supports pretty-printing, JSON to stdout, and CSV append.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::analyzers::rank::{RankKind, RankedEntity};

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as JSON to `out`, one document per call.
pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Writes a value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    write_json(&mut stdout.lock(), value, pretty)
}

/// One CSV row of an exported ranking.
#[derive(Debug, Serialize)]
pub struct RankingRecord<'a> {
    pub generated_at: DateTime<Utc>,
    pub kind: &'static str,
    pub rank: usize,
    pub entity_id: &'a str,
    pub mentions: u64,
    pub avg_sev: f64,
    pub avg_sent: f64,
    pub score: f64,
}

/// Appends a ranking to a CSV file, one row per entity.
///
/// Creates the file with headers if it does not already exist.
pub fn append_rankings(path: &str, kind: RankKind, ranked: &[RankedEntity]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = ranked.len(), "Appending ranking CSV");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    let now = Utc::now();
    for (idx, entity) in ranked.iter().enumerate() {
        writer.serialize(RankingRecord {
            generated_at: now,
            kind: kind.as_str(),
            rank: idx + 1,
            entity_id: &entity.entity_id,
            mentions: entity.mentions,
            avg_sev: entity.avg_sev,
            avg_sent: entity.avg_sent,
            score: entity.score,
        })?;
    }
    writer.flush()?;

    Ok(())
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analyzers::types::RankRow;

/// Rows kept by [`rank_entities`].
pub const RANK_TOP_K: usize = 8;
/// Rows kept on each side by [`rank_by_mentions`].
pub const MENTION_TOP_K: usize = 6;

/// Which end of the ranking to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankKind {
    /// Low severity, high sentiment.
    Best,
    /// High severity, low sentiment.
    Worst,
}

impl RankKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankKind::Best => "best",
            RankKind::Worst => "worst",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown rank kind '{0}', expected 'best' or 'worst'")]
pub struct ParseRankKindError(String);

impl FromStr for RankKind {
    type Err = ParseRankKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(RankKind::Best),
            "worst" => Ok(RankKind::Worst),
            other => Err(ParseRankKindError(other.to_string())),
        }
    }
}

/// Blend weights for severity and sentiment in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub severity: f64,
    pub sentiment: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        RankWeights {
            severity: 0.6,
            sentiment: 0.4,
        }
    }
}

/// A ranked sub-entity together with the score it was ordered by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub entity_id: String,
    pub mentions: u64,
    pub avg_sev: f64,
    pub avg_sent: f64,
    pub score: f64,
}

/// Composite desirability score for one row.
///
/// `avg_sent` is expected in [-1, 1]: `best` rescales it to [0, 2] and
/// `worst` to [0, 1] before blending.
pub fn composite_score(row: &RankRow, kind: RankKind, w: &RankWeights) -> f64 {
    match kind {
        RankKind::Best => (1.0 - row.avg_sev) * w.severity + (row.avg_sent + 1.0) * w.sentiment,
        RankKind::Worst => {
            row.avg_sev * w.severity + (1.0 - (row.avg_sent + 1.0) / 2.0) * w.sentiment
        }
    }
}

/// Scores every identified row, sorts descending by score (stable) and keeps
/// the first `top_k`. Rows without an identifier are dropped.
pub fn rank_entities(
    rows: &[RankRow],
    kind: RankKind,
    top_k: usize,
    weights: &RankWeights,
) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = rows
        .iter()
        .filter_map(|row| {
            let id = row.id()?;
            Some(RankedEntity {
                entity_id: id.to_string(),
                mentions: row.mentions,
                avg_sev: row.avg_sev,
                avg_sent: row.avg_sent,
                score: composite_score(row, kind, weights),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}

/// Most and least mentioned sub-entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MentionRanking {
    pub most: Vec<RankRow>,
    pub least: Vec<RankRow>,
}

/// Orders identified rows by mentions (descending, stable) and returns the
/// first `top_k` from each end. `least` is in ascending mention order.
pub fn rank_by_mentions(rows: &[RankRow], top_k: usize) -> MentionRanking {
    let mut sorted: Vec<RankRow> = rows.iter().filter(|r| r.id().is_some()).cloned().collect();
    sorted.sort_by(|a, b| b.mentions.cmp(&a.mentions));

    let most = sorted.iter().take(top_k).cloned().collect();
    let least = sorted.iter().rev().take(top_k).cloned().collect();

    MentionRanking { most, least }
}

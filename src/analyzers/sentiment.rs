use serde::Serialize;

use crate::analyzers::bucket::NO_DATA_LABEL;
use crate::analyzers::types::{CategoryCount, SignalSummary};
use crate::analyzers::utility::pct;

/// Share of negative, neutral and positive comments, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentMix {
    pub neg_pct: f64,
    pub neu_pct: f64,
    pub pos_pct: f64,
    /// Raw `neg + neu + pos` (saturating); may be 0, in which case all shares are 0.
    pub total: u64,
}

/// Converts the three sentiment counts into percentages of their sum.
pub fn sentiment_mix(summary: &SignalSummary) -> SentimentMix {
    let total = summary
        .neg_count
        .saturating_add(summary.neu_count)
        .saturating_add(summary.pos_count);
    let denom = summary.neg_count as f64 + summary.neu_count as f64 + summary.pos_count as f64;

    SentimentMix {
        neg_pct: pct(summary.neg_count as f64, denom),
        neu_pct: pct(summary.neu_count as f64, denom),
        pos_pct: pct(summary.pos_count as f64, denom),
        total,
    }
}

/// The counts as donut segments. Zero counts are left out; when all three
/// are zero a single "No data" segment keeps the chart shape stable.
pub fn sentiment_segments(summary: &SignalSummary) -> Vec<CategoryCount> {
    let segments: Vec<CategoryCount> = [
        ("Negative", summary.neg_count),
        ("Neutral", summary.neu_count),
        ("Positive", summary.pos_count),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(label, count)| CategoryCount::new(label, count as f64))
    .collect();

    if segments.is_empty() {
        vec![CategoryCount::new(NO_DATA_LABEL, 1.0)]
    } else {
        segments
    }
}

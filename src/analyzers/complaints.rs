use serde::Serialize;

use crate::analyzers::types::{FeedItem, SignalSummary};
use crate::analyzers::utility::pct;

/// Severity at or above which a neutral-labelled comment counts as a complaint.
pub const DEFAULT_HIGH_SEV_THRESHOLD: f64 = 0.66;

/// Complaints (negative + high-severity neutral) against praise (positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplaintPraise {
    pub complaints: u64,
    pub praise: u64,
    pub neg: u64,
    pub high_sev_neutral: u64,
    pub complaints_pct: f64,
    pub praise_pct: f64,
    pub threshold: f64,
}

impl ComplaintPraise {
    pub fn signals(&self) -> u64 {
        self.complaints.saturating_add(self.praise)
    }
}

/// Counts neutral feed items with severity `>= threshold` as extra complaints
/// on top of the summary's negative count.
///
/// Items with no severity score are treated as severity 0. Negative items in
/// the feed are not added again; they are already in `neg_count`.
pub fn complaints_vs_praise(
    summary: &SignalSummary,
    feed: &[FeedItem],
    threshold: f64,
) -> ComplaintPraise {
    let high_sev_neutral = feed
        .iter()
        .filter(|item| item.is_neutral() && item.severity_score.unwrap_or(0.0) >= threshold)
        .count() as u64;

    let complaints = summary.neg_count.saturating_add(high_sev_neutral);
    let praise = summary.pos_count;
    let total = complaints as f64 + praise as f64;

    ComplaintPraise {
        complaints,
        praise,
        neg: summary.neg_count,
        high_sev_neutral,
        complaints_pct: pct(complaints as f64, total),
        praise_pct: pct(praise as f64, total),
        threshold,
    }
}

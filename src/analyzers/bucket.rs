//! Top-N reduction of labeled counts with a trailing "Other" bucket.

use serde::Serialize;

use crate::analyzers::types::CategoryCount;
use crate::analyzers::utility::pct;

pub const OTHER_LABEL: &str = "Other";
pub const NO_DATA_LABEL: &str = "No data";

/// Buckets kept for donut charts.
pub const CHART_TOP_N: usize = 8;
/// Buckets kept for stacked-bar breakdown cards.
pub const BREAKDOWN_TOP_N: usize = 10;

/// Keeps the `top_n` largest positive entries and folds the rest into a
/// single "Other" entry.
///
/// Ties keep their input order. "Other" is appended only when the folded
/// remainder is positive. An empty result is replaced by one "No data"
/// entry of value 1 so charts never receive an empty set.
pub fn top_n_with_other<I>(items: I, top_n: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = CategoryCount>,
{
    let mut positive: Vec<CategoryCount> = items.into_iter().filter(|c| c.value > 0.0).collect();
    positive.sort_by(|a, b| b.value.total_cmp(&a.value));

    let rest = if positive.len() > top_n {
        positive.split_off(top_n)
    } else {
        Vec::new()
    };
    let other: f64 = rest.iter().map(|c| c.value).sum();

    let mut out = positive;
    if other > 0.0 {
        out.push(CategoryCount::new(OTHER_LABEL, other));
    }

    if out.is_empty() {
        out.push(CategoryCount::new(NO_DATA_LABEL, 1.0));
    }

    out
}

/// One bucket with its share of the bucketed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketShare {
    pub label: String,
    pub value: f64,
    pub pct: f64,
}

/// Attaches each bucket's percentage of the summed values, clamped to [0, 100].
pub fn with_shares(buckets: &[CategoryCount]) -> Vec<BucketShare> {
    let total: f64 = buckets.iter().map(|b| b.value).sum();

    buckets
        .iter()
        .map(|b| BucketShare {
            label: b.label.clone(),
            value: b.value,
            pct: pct(b.value, total).clamp(0.0, 100.0),
        })
        .collect()
}

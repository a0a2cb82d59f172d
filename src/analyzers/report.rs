use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::analyzers::bucket::{BucketShare, top_n_with_other, with_shares};
use crate::analyzers::complaints::{ComplaintPraise, complaints_vs_praise};
use crate::analyzers::labels::filter_by_label;
use crate::analyzers::rank::{MentionRanking, RankKind, RankedEntity, rank_by_mentions, rank_entities};
use crate::analyzers::sentiment::{SentimentMix, sentiment_mix, sentiment_segments};
use crate::analyzers::series::{TrendView, trend_view};
use crate::analyzers::types::{
    BreakdownRow, CategoryCount, FeedItem, RankRow, SummaryEnvelope, ThemeRecord, decode_list,
};
use crate::analyzers::volatility::{Volatility, volatility};
use crate::config::AnalysisConfig;

/// Everything the API returned for one entity.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub summary: SummaryEnvelope,
    pub listing_mentions: Option<u64>,
    pub themes: Vec<ThemeRecord>,
    pub feed: Vec<FeedItem>,
    pub trend: Vec<Value>,
    pub lines: Vec<BreakdownRow>,
    pub ships: Vec<BreakdownRow>,
    pub ranks: Vec<RankRow>,
    pub theme_query: Option<String>,
}

impl ReportInput {
    /// Decodes raw JSON responses. Missing or non-array responses become
    /// empty lists.
    pub fn from_values(
        summary: &Value,
        themes: &Value,
        feed: &Value,
        trend: &Value,
        lines: &Value,
        ships: &Value,
        ranks: &Value,
    ) -> Self {
        ReportInput {
            summary: SummaryEnvelope::from_value(summary),
            themes: decode_list(themes),
            feed: decode_list(feed),
            trend: trend.as_array().cloned().unwrap_or_default(),
            lines: decode_list(lines),
            ships: decode_list(ships),
            ranks: decode_list(ranks),
            ..Default::default()
        }
    }
}

/// Display-ready summary of one entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub mentions: Option<u64>,
    pub avg_sentiment: Option<f64>,
    pub avg_severity: Option<f64>,
    pub theme_count: usize,
    pub sentiment_mix: SentimentMix,
    pub sentiment_segments: Vec<CategoryCount>,
    pub complaints: ComplaintPraise,
    pub volatility: Volatility,
    pub themes: Vec<CategoryCount>,
    pub lines: Vec<BucketShare>,
    pub ships: Vec<BucketShare>,
    pub best: Vec<RankedEntity>,
    pub worst: Vec<RankedEntity>,
    pub by_mentions: MentionRanking,
    pub trend: TrendView,
}

fn breakdown(rows: &[BreakdownRow], top_n: usize) -> Vec<BucketShare> {
    let buckets = top_n_with_other(rows.iter().filter_map(BreakdownRow::to_category), top_n);
    with_shares(&buckets)
}

/// Runs every aggregator over one entity's records.
pub fn build_report(input: &ReportInput, cfg: &AnalysisConfig) -> EntityReport {
    let signal = input.summary.signal();
    let query = input.theme_query.as_deref().unwrap_or("");

    let themes = top_n_with_other(
        filter_by_label(&input.themes, query, |t| t.theme_label.as_str())
            .into_iter()
            .map(CategoryCount::from),
        cfg.theme_top_n,
    );

    EntityReport {
        schema_version: 1,
        generated_at: Utc::now(),
        mentions: input.summary.mentions(input.listing_mentions),
        avg_sentiment: input.summary.avg_sentiment(),
        avg_severity: input.summary.avg_severity(),
        theme_count: input.themes.len(),
        sentiment_mix: sentiment_mix(signal),
        sentiment_segments: sentiment_segments(signal),
        complaints: complaints_vs_praise(signal, &input.feed, cfg.high_sev_threshold),
        volatility: volatility(&input.feed, &cfg.volatility),
        themes,
        lines: breakdown(&input.lines, cfg.breakdown_top_n),
        ships: breakdown(&input.ships, cfg.breakdown_top_n),
        best: rank_entities(&input.ranks, RankKind::Best, cfg.rank_top_k, &cfg.rank_weights),
        worst: rank_entities(&input.ranks, RankKind::Worst, cfg.rank_top_k, &cfg.rank_weights),
        by_mentions: rank_by_mentions(&input.ranks, cfg.mention_top_k),
        trend: trend_view(&input.trend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_degrades_to_placeholders() {
        let report = build_report(&ReportInput::default(), &AnalysisConfig::default());

        assert_eq!(report.mentions, None);
        assert_eq!(report.sentiment_mix.total, 0);
        assert_eq!(report.volatility, Volatility::NoData);
        assert_eq!(report.themes, vec![CategoryCount::new("No data", 1.0)]);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].pct, 100.0);
        assert!(report.best.is_empty());
        assert_eq!(report.trend.rows.len(), 1);
    }

    #[test]
    fn test_report_from_values() {
        let input = ReportInput::from_values(
            &json!({ "mentions": 12, "sentiment": { "neg_count": 2, "neu_count": 5, "pos_count": 3 } }),
            &json!([{ "theme_label": "Lost luggage", "n": 4 }, { "theme_label": "Food", "n": 6 }]),
            &json!([
                { "object_id": "a", "sentiment_label": "neutral", "severity_score": 0.9 },
                { "object_id": "b", "sentiment_label": "neu", "severity_score": 0.1 }
            ]),
            &json!([{ "month": "2024-01", "mentions": 3 }]),
            &json!([{ "line_id": "carnival", "line_name": "Carnival", "mentions": 3 }]),
            &json!("not a list"),
            &json!([{ "port_id": "nassau", "mentions": 4, "avg_sev": 0.2, "avg_sent": 0.3 }]),
        );

        let report = build_report(&input, &AnalysisConfig::default());

        assert_eq!(report.mentions, Some(12));
        assert_eq!(report.complaints.complaints, 3);
        assert_eq!(report.complaints.praise, 3);
        assert_eq!(report.themes[0].label, "Food");
        assert_eq!(report.theme_count, 2);
        assert_eq!(report.lines[0].label, "Carnival");
        assert_eq!(report.ships[0].label, "No data");
        assert_eq!(report.best[0].entity_id, "nassau");
        assert_eq!(report.trend.keys.axis, "month");
    }

    #[test]
    fn test_theme_query_filters_buckets_not_count() {
        let input = ReportInput {
            themes: vec![theme("Lost luggage", 4), theme("Food", 6), theme("Luggage fees", 1)],
            theme_query: Some("luggage".to_string()),
            ..Default::default()
        };

        let report = build_report(&input, &AnalysisConfig::default());
        let labels: Vec<_> = report.themes.iter().map(|t| t.label.as_str()).collect();

        assert_eq!(labels, ["Lost luggage", "Luggage fees"]);
        assert_eq!(report.theme_count, 3);
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(&ReportInput::default(), &AnalysisConfig::default());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["volatility"]["status"], "no_data");
    }

    fn theme(label: &str, n: u64) -> ThemeRecord {
        ThemeRecord {
            theme_label: label.to_string(),
            n,
            ..Default::default()
        }
    }
}

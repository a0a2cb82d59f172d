//! Spread of severity scores across a feed, as a 0–100 meter.

use serde::{Deserialize, Serialize};

use crate::analyzers::types::FeedItem;
use crate::analyzers::utility::{mean, stddev};

/// Calibration for the volatility meter.
///
/// `divisor` is the standard deviation that maps to 100; 0.5 assumes
/// severity scores in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityCalibration {
    pub divisor: f64,
    pub chaotic_above: f64,
    pub mixed_above: f64,
}

impl Default for VolatilityCalibration {
    fn default() -> Self {
        VolatilityCalibration {
            divisor: 0.5,
            chaotic_above: 65.0,
            mixed_above: 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolatilityLabel {
    Stable,
    Mixed,
    Chaotic,
}

impl VolatilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityLabel::Stable => "Stable",
            VolatilityLabel::Mixed => "Mixed",
            VolatilityLabel::Chaotic => "Chaotic",
        }
    }
}

impl std::fmt::Display for VolatilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityScore {
    pub pct: f64,
    pub label: VolatilityLabel,
    pub std_dev: f64,
    pub mean: f64,
}

/// Result of scoring a feed. An empty feed is a valid outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Volatility {
    NoData,
    Scored(VolatilityScore),
}

impl Volatility {
    pub fn score(&self) -> Option<&VolatilityScore> {
        match self {
            Volatility::NoData => None,
            Volatility::Scored(score) => Some(score),
        }
    }
}

/// Maps a 0–100 volatility percentage onto its label.
///
/// | Range  | Label   |
/// |--------|---------|
/// | > 65   | Chaotic |
/// | > 35   | Mixed   |
/// | <= 35  | Stable  |
pub fn classify(pct: f64, cal: &VolatilityCalibration) -> VolatilityLabel {
    match pct {
        p if p > cal.chaotic_above => VolatilityLabel::Chaotic,
        p if p > cal.mixed_above => VolatilityLabel::Mixed,
        _ => VolatilityLabel::Stable,
    }
}

/// Scores the population standard deviation of the feed's severity scores.
/// Items without a finite numeric severity are ignored.
pub fn volatility(feed: &[FeedItem], cal: &VolatilityCalibration) -> Volatility {
    let scores: Vec<f64> = feed
        .iter()
        .filter_map(|item| item.severity_score)
        .filter(|s| s.is_finite())
        .collect();

    if scores.is_empty() {
        return Volatility::NoData;
    }

    let avg = mean(&scores);
    let sd = stddev(&scores, avg);
    let pct = (sd / cal.divisor * 100.0).clamp(0.0, 100.0);

    Volatility::Scored(VolatilityScore {
        pct,
        label: classify(pct, cal),
        std_dev: sd,
        mean: avg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_classify_boundaries() {
        let cal = VolatilityCalibration::default();
        assert_eq!(classify(100.0, &cal), VolatilityLabel::Chaotic);
        assert_eq!(classify(65.1, &cal), VolatilityLabel::Chaotic);
        assert_eq!(classify(65.0, &cal), VolatilityLabel::Mixed);
        assert_eq!(classify(35.1, &cal), VolatilityLabel::Mixed);
        assert_eq!(classify(35.0, &cal), VolatilityLabel::Stable);
        assert_eq!(classify(0.0, &cal), VolatilityLabel::Stable);
    }

    #[test]
    fn test_alternating_severities_are_chaotic() {
        let feed = feed_with(&[Some(0.9), Some(0.1), Some(0.9), Some(0.1)]);
        let result = volatility(&feed, &VolatilityCalibration::default());
        let score = result.score().unwrap();

        assert!(approx(score.mean, 0.5));
        assert!(approx(score.std_dev, 0.4));
        assert!(approx(score.pct, 80.0));
        assert_eq!(score.label, VolatilityLabel::Chaotic);
    }

    #[test]
    fn test_constant_severity_is_stable() {
        let feed = feed_with(&[Some(0.5), Some(0.5), Some(0.5)]);
        let score = *volatility(&feed, &VolatilityCalibration::default())
            .score()
            .unwrap();

        assert_eq!(score.std_dev, 0.0);
        assert_eq!(score.pct, 0.0);
        assert_eq!(score.label, VolatilityLabel::Stable);
    }

    #[test]
    fn test_empty_feed_is_no_data() {
        assert_eq!(
            volatility(&[], &VolatilityCalibration::default()),
            Volatility::NoData
        );
        assert_eq!(
            volatility(&feed_with(&[None, None]), &VolatilityCalibration::default()),
            Volatility::NoData
        );
    }

    #[test]
    fn test_missing_scores_are_skipped() {
        let feed = feed_with(&[Some(0.2), None, Some(0.2)]);
        let score = *volatility(&feed, &VolatilityCalibration::default())
            .score()
            .unwrap();
        assert!(approx(score.mean, 0.2));
    }

    #[test]
    fn test_infinite_severity_is_dropped() {
        let feed: Vec<FeedItem> = crate::analyzers::types::decode_list(&serde_json::json!([
            { "object_id": "a", "severity_score": "inf" },
            { "object_id": "b", "severity_score": 0.2 }
        ]));
        assert_eq!(feed[0].severity_score, None);

        let mut feed_with_inf = feed_with(&[Some(f64::INFINITY), Some(0.2)]);
        feed_with_inf.extend(feed);

        let score = *volatility(&feed_with_inf, &VolatilityCalibration::default())
            .score()
            .unwrap();
        assert_eq!(score.pct, 0.0);
        assert!(approx(score.mean, 0.2));
        assert_eq!(score.label, VolatilityLabel::Stable);
    }

    #[test]
    fn test_pct_is_capped() {
        let feed = feed_with(&[Some(0.0), Some(5.0)]);
        let score = *volatility(&feed, &VolatilityCalibration::default())
            .score()
            .unwrap();
        assert_eq!(score.pct, 100.0);
    }

    #[test]
    fn test_no_data_serializes_with_status() {
        let json = serde_json::to_value(Volatility::NoData).unwrap();
        assert_eq!(json["status"], "no_data");
    }

    fn feed_with(scores: &[Option<f64>]) -> Vec<FeedItem> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| FeedItem {
                object_id: format!("c{i}"),
                severity_score: *s,
                ..Default::default()
            })
            .collect()
    }
}

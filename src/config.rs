//! Runtime configuration.
//!
//! Values come from the environment (after `dotenvy` has loaded any `.env`
//! file). Every calibration constant has a default matching the dashboard's
//! shipped behaviour.

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::analyzers::bucket::{BREAKDOWN_TOP_N, CHART_TOP_N};
use crate::analyzers::complaints::DEFAULT_HIGH_SEV_THRESHOLD;
use crate::analyzers::rank::{MENTION_TOP_K, RANK_TOP_K, RankWeights};
use crate::analyzers::volatility::VolatilityCalibration;

pub const DEFAULT_THUMBNAIL_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/cruise_signal.log";

/// Tunable parameters for the scoring routines.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub high_sev_threshold: f64,
    pub volatility: VolatilityCalibration,
    pub rank_weights: RankWeights,
    pub theme_top_n: usize,
    pub breakdown_top_n: usize,
    pub rank_top_k: usize,
    pub mention_top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            high_sev_threshold: DEFAULT_HIGH_SEV_THRESHOLD,
            volatility: VolatilityCalibration::default(),
            rank_weights: RankWeights::default(),
            theme_top_n: CHART_TOP_N,
            breakdown_top_n: BREAKDOWN_TOP_N,
            rank_top_k: RANK_TOP_K,
            mention_top_k: MENTION_TOP_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub thumbnail_base_url: String,
    pub thumbnail_timeout: Duration,
    pub log_file_path: String,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AnalysisConfig::default();

        let analysis = AnalysisConfig {
            high_sev_threshold: parse_or(&lookup, "HIGH_SEV_THRESHOLD", defaults.high_sev_threshold)?,
            volatility: VolatilityCalibration {
                divisor: parse_or(&lookup, "VOLATILITY_DIVISOR", defaults.volatility.divisor)?,
                ..defaults.volatility
            },
            rank_weights: RankWeights {
                severity: parse_or(
                    &lookup,
                    "RANK_SEVERITY_WEIGHT",
                    defaults.rank_weights.severity,
                )?,
                sentiment: parse_or(
                    &lookup,
                    "RANK_SENTIMENT_WEIGHT",
                    defaults.rank_weights.sentiment,
                )?,
            },
            ..defaults
        };

        if analysis.volatility.divisor <= 0.0 {
            anyhow::bail!(
                "VOLATILITY_DIVISOR must be positive, got {}",
                analysis.volatility.divisor
            );
        }

        Ok(Config {
            thumbnail_base_url: lookup("THUMBNAIL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_THUMBNAIL_BASE_URL.to_string()),
            thumbnail_timeout: Duration::from_secs(parse_or(&lookup, "THUMBNAIL_TIMEOUT_SECS", 10)?),
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            analysis,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(|_| None).unwrap();

        assert_eq!(cfg.thumbnail_base_url, DEFAULT_THUMBNAIL_BASE_URL);
        assert_eq!(cfg.thumbnail_timeout, Duration::from_secs(10));
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        assert_eq!(cfg.analysis.high_sev_threshold, 0.66);
        assert_eq!(cfg.analysis.volatility.divisor, 0.5);
        assert_eq!(cfg.analysis.rank_weights.severity, 0.6);
        assert_eq!(cfg.analysis.rank_weights.sentiment, 0.4);
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("HIGH_SEV_THRESHOLD", "0.8"),
            ("RANK_SEVERITY_WEIGHT", " 0.5 "),
            ("THUMBNAIL_BASE_URL", "http://localhost:9000/summary"),
            ("THUMBNAIL_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(cfg.analysis.high_sev_threshold, 0.8);
        assert_eq!(cfg.analysis.rank_weights.severity, 0.5);
        assert_eq!(cfg.analysis.rank_weights.sentiment, 0.4);
        assert_eq!(cfg.thumbnail_base_url, "http://localhost:9000/summary");
        assert_eq!(cfg.thumbnail_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = Config::from_lookup(lookup_from(&[("HIGH_SEV_THRESHOLD", "high")])).unwrap_err();
        assert!(err.to_string().contains("HIGH_SEV_THRESHOLD"));
    }

    #[test]
    fn test_non_positive_divisor_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("VOLATILITY_DIVISOR", "0")])).is_err());
    }

    #[test]
    fn test_blank_value_uses_default() {
        let cfg = Config::from_lookup(lookup_from(&[("VOLATILITY_DIVISOR", "  ")])).unwrap();
        assert_eq!(cfg.analysis.volatility.divisor, 0.5);
    }
}

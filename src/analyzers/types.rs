//! Records decoded from the analytics API.
//!
//! Every field has a default so that partial or sloppy payloads still decode;
//! numeric fields accept numbers or numeric strings, anything else falls back
//! to the field default.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Sentiment counts and averages for one entity (port, line or ship).
///
/// Counts and averages are independent: nothing here checks that
/// `mentions == neg_count + neu_count + pos_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSummary {
    #[serde(deserialize_with = "lenient::opt_count")]
    pub mentions: Option<u64>,
    #[serde(deserialize_with = "lenient::number")]
    pub avg_sentiment: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub avg_severity: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub neg_count: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub neu_count: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub pos_count: u64,
}

impl SignalSummary {
    pub fn from_counts(neg: u64, neu: u64, pos: u64) -> Self {
        SignalSummary {
            neg_count: neg,
            neu_count: neu,
            pos_count: pos,
            ..Default::default()
        }
    }
}

/// The entity summary response, which carries its counts either at the top
/// level or nested under `sentiment`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryEnvelope {
    pub flat: SignalSummary,
    pub nested: Option<SignalSummary>,
}

impl SummaryEnvelope {
    /// Decodes either response shape. Non-object input yields an empty summary.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }

        let flat = serde_json::from_value(value.clone()).unwrap_or_default();
        let nested = value
            .get("sentiment")
            .filter(|s| s.is_object())
            .and_then(|s| serde_json::from_value(s.clone()).ok());

        SummaryEnvelope { flat, nested }
    }

    /// The object holding the sentiment counts: nested when present.
    pub fn signal(&self) -> &SignalSummary {
        self.nested.as_ref().unwrap_or(&self.flat)
    }

    /// Mention count, falling back to the nested object and then to the
    /// count reported by the entity listing.
    pub fn mentions(&self, listing_mentions: Option<u64>) -> Option<u64> {
        self.flat
            .mentions
            .or_else(|| self.nested.as_ref().and_then(|s| s.mentions))
            .or(listing_mentions)
    }

    pub fn avg_sentiment(&self) -> Option<f64> {
        self.flat
            .avg_sentiment
            .or_else(|| self.nested.as_ref().and_then(|s| s.avg_sentiment))
    }

    pub fn avg_severity(&self) -> Option<f64> {
        self.flat
            .avg_severity
            .or_else(|| self.nested.as_ref().and_then(|s| s.avg_severity))
    }
}

/// A labeled topical cluster with its mention count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeRecord {
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub theme_label: String,
    #[serde(deserialize_with = "lenient::count")]
    pub n: u64,
    #[serde(deserialize_with = "lenient::number")]
    pub avg_sent: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub neg_count: u64,
}

/// Polarity label attached to a feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
    Other,
}

impl From<&str> for SentimentLabel {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "neg" | "negative" => SentimentLabel::Negative,
            "neu" | "neutral" => SentimentLabel::Neutral,
            "pos" | "positive" => SentimentLabel::Positive,
            _ => SentimentLabel::Other,
        }
    }
}

/// One scored comment from an entity feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub object_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub severity_score: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub sentiment_score: Option<f64>,
    #[serde(deserialize_with = "lenient::label")]
    pub sentiment_label: Option<SentimentLabel>,
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub preview: String,
    #[serde(deserialize_with = "lenient::text")]
    pub permalink: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub subreddit: Option<String>,
}

impl FeedItem {
    pub fn is_neutral(&self) -> bool {
        self.sentiment_label == Some(SentimentLabel::Neutral)
    }
}

/// A sub-entity inside a parent, e.g. a port within a cruise line.
///
/// Rows without an identifier are kept at decode time and dropped by the
/// rankers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankRow {
    #[serde(
        alias = "port_id",
        alias = "line_id",
        alias = "ship_id",
        deserialize_with = "lenient::text"
    )]
    pub entity_id: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub mentions: u64,
    #[serde(deserialize_with = "lenient::number_or_zero")]
    pub avg_sev: f64,
    #[serde(deserialize_with = "lenient::number_or_zero")]
    pub avg_sent: f64,
}

impl RankRow {
    /// The identifier, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.entity_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A line or ship seen at a port, with its mention count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownRow {
    #[serde(
        alias = "line_id",
        alias = "ship_id",
        alias = "port_id",
        deserialize_with = "lenient::text"
    )]
    pub id: Option<String>,
    #[serde(alias = "line_name", alias = "name", deserialize_with = "lenient::text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub mentions: u64,
}

impl BreakdownRow {
    /// Display label, falling back to the identifier. `None` when neither is set.
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }

    pub fn to_category(&self) -> Option<CategoryCount> {
        self.display_label()
            .map(|label| CategoryCount::new(label, self.mentions as f64))
    }
}

/// Generic labeled count consumed by the bucketer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub value: f64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        CategoryCount {
            label: label.into(),
            value,
        }
    }
}

impl From<&ThemeRecord> for CategoryCount {
    fn from(theme: &ThemeRecord) -> Self {
        let label = if theme.theme_label.is_empty() {
            "—"
        } else {
            theme.theme_label.as_str()
        };
        CategoryCount::new(label, theme.n as f64)
    }
}

/// Decodes a JSON array into records, skipping elements that fail to decode.
/// Anything other than an array yields an empty list.
pub fn decode_list<T: serde::de::DeserializeOwned>(value: &Value) -> Vec<T> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = idx, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}

mod lenient {
    use super::SentimentLabel;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|x| x.is_finite())
    }

    fn as_count(value: &Value) -> Option<u64> {
        as_f64(value).map(|x| if x > 0.0 { x as u64 } else { 0 })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(as_count(&Value::deserialize(d)?).unwrap_or(0))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(as_count(&Value::deserialize(d)?))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(as_f64(&Value::deserialize(d)?))
    }

    pub fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(as_f64(&Value::deserialize(d)?).unwrap_or(0.0))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        text(d).map(Option::unwrap_or_default)
    }

    pub fn label<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SentimentLabel>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(SentimentLabel::from(s.as_str())),
            _ => None,
        })
    }
}

//! Key inference for schema-less time-series rows.

use serde::Serialize;
use serde_json::{Map, Value};

const AXIS_HINTS: &[&str] = &["date", "time", "day", "week", "month", "bucket"];
const MAX_SERIES: usize = 2;

/// Axis field plus the 1–2 fields plotted against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesKeys {
    pub axis: String,
    pub series: Vec<String>,
}

impl Default for SeriesKeys {
    fn default() -> Self {
        SeriesKeys {
            axis: "x".to_string(),
            series: vec!["y".to_string()],
        }
    }
}

/// Keys plus rows that are safe to hand to a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub keys: SeriesKeys,
    pub rows: Vec<Value>,
}

fn looks_like_axis(key: &str) -> bool {
    let key = key.to_lowercase();
    AXIS_HINTS.iter().any(|hint| key.contains(hint))
}

/// Infers keys from the first row only; the rest are assumed to share its shape.
///
/// The axis is the first field whose name looks temporal, else the first
/// field. Series are the numeric fields other than the axis, at most two;
/// with none, the second field name (or `"y"`) is used.
pub fn infer_series_keys(rows: &[Value]) -> SeriesKeys {
    let Some(first) = rows.first().and_then(Value::as_object) else {
        return SeriesKeys::default();
    };
    let Some(first_key) = first.keys().next() else {
        return SeriesKeys::default();
    };

    let axis = first
        .keys()
        .find(|k| looks_like_axis(k))
        .unwrap_or(first_key)
        .clone();

    let series: Vec<String> = first
        .iter()
        .filter(|(k, v)| **k != axis && v.is_number())
        .map(|(k, _)| k.clone())
        .take(MAX_SERIES)
        .collect();

    let series = if series.is_empty() {
        vec![first.keys().nth(1).cloned().unwrap_or_else(|| "y".to_string())]
    } else {
        series
    };

    SeriesKeys { axis, series }
}

/// Infers keys and substitutes a single zero-valued placeholder row when
/// there is nothing to plot.
pub fn trend_view(rows: &[Value]) -> TrendView {
    let keys = infer_series_keys(rows);

    let rows = if rows.is_empty() {
        let mut placeholder = Map::new();
        placeholder.insert(keys.axis.clone(), Value::from("—"));
        placeholder.insert(keys.series[0].clone(), Value::from(0));
        vec![Value::Object(placeholder)]
    } else {
        rows.to_vec()
    };

    TrendView { keys, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_axis_and_numeric_series() {
        let rows = vec![json!({ "date": "2024-01", "mentions": 5, "avg_sent": 0.2 })];
        let keys = infer_series_keys(&rows);

        assert_eq!(keys.axis, "date");
        assert_eq!(keys.series, ["mentions", "avg_sent"]);
    }

    #[test]
    fn test_axis_match_is_case_insensitive_and_not_first() {
        let rows = vec![json!({ "avg_sev": 0.4, "Month": "2024-03", "avg_sent": 0.1, "mentions": 3 })];
        let keys = infer_series_keys(&rows);

        assert_eq!(keys.axis, "Month");
        assert_eq!(keys.series, ["avg_sev", "avg_sent"]);
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let rows = vec![json!({ "label": "a", "count": 2 })];
        let keys = infer_series_keys(&rows);

        assert_eq!(keys.axis, "label");
        assert_eq!(keys.series, ["count"]);
    }

    #[test]
    fn test_no_numeric_fields_uses_second_field() {
        let rows = vec![json!({ "week": "w1", "note": "quiet" })];
        assert_eq!(infer_series_keys(&rows).series, ["note"]);

        let rows = vec![json!({ "week": "w1" })];
        assert_eq!(infer_series_keys(&rows).series, ["y"]);
    }

    #[test]
    fn test_malformed_first_row_defaults() {
        assert_eq!(infer_series_keys(&[json!(42)]), SeriesKeys::default());
        assert_eq!(infer_series_keys(&[json!({})]), SeriesKeys::default());
        assert_eq!(infer_series_keys(&[]), SeriesKeys::default());
    }

    #[test]
    fn test_only_first_row_governs() {
        let rows = vec![
            json!({ "bucket": "b1", "n": 1 }),
            json!({ "other": "x", "a": 1, "b": 2, "c": 3 }),
        ];
        let keys = infer_series_keys(&rows);
        assert_eq!(keys.axis, "bucket");
        assert_eq!(keys.series, ["n"]);
    }

    #[test]
    fn test_empty_trend_gets_placeholder_row() {
        let view = trend_view(&[]);

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0]["y"], json!(0));
        assert_eq!(view.rows[0]["x"], json!("—"));
    }

    #[test]
    fn test_trend_view_passes_rows_through() {
        let rows = vec![json!({ "month": "2024-01", "n": 1 }), json!({ "month": "2024-02", "n": 4 })];
        let view = trend_view(&rows);
        assert_eq!(view.rows, rows);
    }
}

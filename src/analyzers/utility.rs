/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Percentage of `part` in `total`, with a zero total treated as 1 so the
/// degenerate case reports 0 instead of dividing by zero.
pub fn pct(part: f64, total: f64) -> f64 {
    let total = if total == 0.0 { 1.0 } else { total };
    part * 100.0 / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_stddev_is_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(stddev(&values, m), 2.0);
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50.0, 100.0), 50.0);
        assert_eq!(pct(1.0, 4.0), 25.0);
        assert_eq!(pct(3.0, 10.0), 30.0);
    }
}

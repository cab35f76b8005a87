//! Aggregate price statistics over scraped listings.

use serde::{Deserialize, Serialize};

/// Summary statistics over the strictly positive prices in a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    /// Number of prices included in the sample.
    pub count: usize,
    pub mean: f64,
    /// Midpoint average for even-sized samples.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceStats {
    /// An all-zero summary for an empty sample.
    pub fn empty() -> Self {
        Self { count: 0, mean: 0.0, median: 0.0, std_dev: 0.0, min: 0.0, max: 0.0 }
    }

    /// Computes statistics over the strictly positive values in `prices`.
    /// Zero and negative entries are sentinel values from failed parses and
    /// are excluded from the sample.
    pub fn from_prices(prices: &[f64]) -> Self {
        let mut sample: Vec<f64> = prices.iter().copied().filter(|p| *p > 0.0).collect();
        if sample.is_empty() {
            return Self::empty();
        }

        sample.sort_by(f64::total_cmp);

        let count = sample.len();
        let mean = sample.iter().sum::<f64>() / count as f64;

        let median = if count % 2 == 1 {
            sample[count / 2]
        } else {
            (sample[count / 2 - 1] + sample[count / 2]) / 2.0
        };

        let variance = sample.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sample[0],
            max: sample[count - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        let stats = PriceStats::from_prices(&[]);
        assert_eq!(stats, PriceStats::empty());
    }

    #[test]
    fn test_all_nonpositive_sample() {
        let stats = PriceStats::from_prices(&[0.0, -5.0, 0.0]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_known_values() {
        let stats = PriceStats::from_prices(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 25.0);
        assert_eq!(stats.median, 25.0);
        assert!((stats.std_dev - 125.0f64.sqrt()).abs() < 1e-9);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
    }

    #[test]
    fn test_odd_count_median() {
        let stats = PriceStats::from_prices(&[30.0, 10.0, 20.0]);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn test_nonpositive_excluded_from_sample() {
        let stats = PriceStats::from_prices(&[10.0, 0.0, 20.0, -3.0]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 15.0);
        assert_eq!(stats.min, 10.0);
    }

    #[test]
    fn test_single_value() {
        let stats = PriceStats::from_prices(&[42.5]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.5);
        assert_eq!(stats.median, 42.5);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 42.5);
        assert_eq!(stats.max, 42.5);
    }

    #[test]
    fn test_unsorted_input() {
        let stats = PriceStats::from_prices(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(stats.median, 25.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let stats = PriceStats::from_prices(&[10.0, 20.0]);
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: PriceStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}

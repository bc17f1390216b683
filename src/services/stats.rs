//! Distribution math behind the catalog summary.

use crate::db::PartitionRow;
use crate::models::{Histogram, PartitionSummary, Stats};
use chrono::Datelike;

const NULL_KEY: &str = "None";

/// Count, null count, streaming mean/std and rank percentiles over one
/// numeric column. Mean and std are computed in a single ascending pass.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(values: &[Option<i32>]) -> Stats {
    let mut sorted: Vec<i32> = values.iter().flatten().copied().collect();
    sorted.sort_unstable();

    let count = values.len() as u64;
    let n = sorted.len();
    let null = (values.len() - n) as u64;

    if n == 0 {
        return Stats {
            count,
            null,
            ..Stats::default()
        };
    }

    let total = n as f64;
    let mut mean = 0.0_f64;
    let mut mean_sq = 0.0_f64;
    for &value in &sorted {
        let value = f64::from(value);
        mean += value / total;
        mean_sq += value * value / total;
    }
    // Rounding can push this just under zero for constant columns.
    let variance = (mean_sq - mean * mean).max(0.0);

    Stats {
        count,
        null,
        mean: Some(mean),
        std: Some(variance.sqrt()),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        percentile_25: Some(sorted[n / 4]),
        percentile_50: Some(sorted[n / 2]),
        percentile_75: Some(sorted[n * 3 / 4]),
    }
}

/// Counts keyed by `Display` output, nulls under `"None"`.
pub fn histogram<I, K>(keys: I) -> Histogram
where
    I: IntoIterator<Item = Option<K>>,
    K: ToString,
{
    let mut counts = Histogram::new();
    for key in keys {
        let key = key.map_or_else(|| NULL_KEY.to_string(), |k| k.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[must_use]
pub fn summarize_partition(rows: &[PartitionRow]) -> PartitionSummary {
    let durations: Vec<Option<i32>> = rows.iter().map(|r| r.duration).collect();

    PartitionSummary {
        count: rows.len() as u64,
        duration: compute_stats(&durations),
        ratings: histogram(rows.iter().map(|r| r.rating.as_deref())),
        release_year: histogram(rows.iter().map(|r| r.release_year)),
        year_added: histogram(rows.iter().map(|r| r.netflix_date_added.map(|d| d.year()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn some(values: &[i32]) -> Vec<Option<i32>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_stats_over_one_to_five() {
        let stats = compute_stats(&some(&[1, 2, 3, 4, 5]));

        assert_eq!(stats.count, 5);
        assert_eq!(stats.null, 0);
        assert!((stats.mean.unwrap() - 3.0).abs() < 1e-9);
        assert!((stats.std.unwrap() - 2.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(stats.min, Some(1));
        assert_eq!(stats.max, Some(5));
        assert_eq!(stats.percentile_25, Some(2));
        assert_eq!(stats.percentile_50, Some(3));
        assert_eq!(stats.percentile_75, Some(4));
    }

    #[test]
    fn test_stats_sort_before_ranking() {
        let stats = compute_stats(&some(&[90, 10, 50, 30]));

        assert_eq!(stats.min, Some(10));
        assert_eq!(stats.max, Some(90));
        // floor(0.5 * 4) = 2
        assert_eq!(stats.percentile_50, Some(50));
    }

    #[test]
    fn test_stats_count_nulls() {
        let stats = compute_stats(&[Some(4), None, Some(8), None]);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.null, 2);
        assert!((stats.mean.unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_all_null() {
        let stats = compute_stats(&[None, None]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.null, 2);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.percentile_50, None);
    }

    #[test]
    fn test_constant_column_has_zero_std() {
        let stats = compute_stats(&some(&[7, 7, 7]));
        assert!(stats.std.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_histogram_null_key() {
        let counts = histogram([Some("TV-MA"), None, Some("TV-MA"), Some("R")]);

        assert_eq!(counts.get("TV-MA"), Some(&2));
        assert_eq!(counts.get("R"), Some(&1));
        assert_eq!(counts.get("None"), Some(&1));
    }

    #[test]
    fn test_summarize_partition() {
        let rows = vec![
            PartitionRow {
                duration: Some(90),
                rating: Some("PG".to_string()),
                release_year: Some(2019),
                netflix_date_added: NaiveDate::from_ymd_opt(2020, 3, 1),
            },
            PartitionRow {
                duration: None,
                rating: None,
                release_year: Some(2019),
                netflix_date_added: None,
            },
        ];

        let summary = summarize_partition(&rows);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.duration.null, 1);
        assert_eq!(summary.release_year.get("2019"), Some(&2));
        assert_eq!(summary.year_added.get("2020"), Some(&1));
        assert_eq!(summary.year_added.get("None"), Some(&1));
        assert_eq!(summary.ratings.get("None"), Some(&1));
    }
}

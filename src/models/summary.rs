use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence counts keyed by the bare value. Nulls are counted under `"None"`.
pub type Histogram = BTreeMap<String, u64>;

/// Distribution of a single numeric column within a partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// All rows, nulls included.
    pub count: u64,
    pub null: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub percentile_25: Option<i32>,
    pub percentile_50: Option<i32>,
    pub percentile_75: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub count: u64,
    pub duration: Stats,
    pub ratings: Histogram,
    pub release_year: Histogram,
    pub year_added: Histogram,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub title_count: u64,
    pub director_count: u64,
    pub cast_member_count: u64,
    pub movies: PartitionSummary,
    pub shows: PartitionSummary,
}

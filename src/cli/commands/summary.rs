use super::open_catalog;
use crate::config::Config;
use crate::models::{Histogram, PartitionSummary};

fn format_histogram(histogram: &Histogram) -> String {
    histogram
        .iter()
        .map(|(value, count)| format!("{value}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_partition(label: &str, partition: &PartitionSummary) {
    println!("{label} ({} titles)", partition.count);

    let float = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
    let int = |value: Option<i32>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    let duration = &partition.duration;
    println!(
        "  Duration:  mean {} | std {} | min {} | median {} | max {} | nulls {}",
        float(duration.mean),
        float(duration.std),
        int(duration.min),
        int(duration.percentile_50),
        int(duration.max),
        duration.null
    );

    if !partition.ratings.is_empty() {
        println!("  Ratings:   {}", format_histogram(&partition.ratings));
    }
    if !partition.release_year.is_empty() {
        println!("  Released:  {}", format_histogram(&partition.release_year));
    }
    if !partition.year_added.is_empty() {
        println!("  Added:     {}", format_histogram(&partition.year_added));
    }
}

pub async fn cmd_summary(config: &Config) -> anyhow::Result<()> {
    let catalog = open_catalog(config).await?;
    let summary = catalog.summary().await?;

    println!("Catalog Summary");
    println!("{:-<60}", "");
    println!("Titles:       {}", summary.title_count);
    println!("Directors:    {}", summary.director_count);
    println!("Cast members: {}", summary.cast_member_count);
    println!();
    print_partition("Movies", &summary.movies);
    print_partition("TV Shows", &summary.shows);

    Ok(())
}

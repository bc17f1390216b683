//! Bulk import of titles from a JSON file.

use super::open_catalog;
use crate::config::Config;
use crate::models::TitleInput;
use anyhow::Context;
use std::path::Path;
use tracing::warn;

pub async fn cmd_import_titles(config: &Config, path: &str) -> anyhow::Result<()> {
    let path = Path::new(path);
    if !path.exists() {
        println!("Path does not exist: {}", path.display());
        return Ok(());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let inputs: Vec<TitleInput> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a JSON array of titles", path.display()))?;

    if inputs.is_empty() {
        println!("No titles to import.");
        return Ok(());
    }

    println!("Importing {} titles...", inputs.len());

    let catalog = open_catalog(config).await?;
    let mut imported = 0usize;
    let mut failed = 0usize;

    for input in inputs {
        let show_id = input.netflix_show_id.clone();
        match catalog.create_title(input).await {
            Ok(_) => imported += 1,
            Err(e) => {
                warn!(netflix_show_id = %show_id, error = %e, "Failed to import title");
                println!("  ✗ {show_id}: {e}");
                failed += 1;
            }
        }
    }

    println!();
    println!("✓ Imported {imported} titles");
    if failed > 0 {
        println!("✗ {failed} failed");
    }

    Ok(())
}

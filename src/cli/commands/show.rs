//! Show title command handler

use super::{open_catalog, parse_title_id};
use crate::config::Config;
use crate::services::CatalogError;

pub async fn cmd_show_title(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_title_id(id_str) else {
        println!("Invalid title ID: {id_str}");
        return Ok(());
    };

    let catalog = open_catalog(config).await?;
    let title = match catalog.get_title(id).await {
        Ok(title) => title,
        Err(CatalogError::NotFound(_)) => {
            println!("Title with ID {id} not found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let or_unknown = |value: Option<String>| value.unwrap_or_else(|| "?".to_string());

    println!("Title Info");
    println!("{:-<60}", "");
    println!("Title:     {}", or_unknown(title.title.clone()));
    println!("ID:        {}", title.id);
    println!("Show ID:   {}", title.netflix_show_id);
    println!("Type:      {}", or_unknown(title.title_type.clone()));
    println!(
        "Released:  {}",
        or_unknown(title.release_year.map(|y| y.to_string()))
    );
    println!("Rating:    {}", or_unknown(title.rating.clone()));
    if let (Some(duration), Some(units)) = (title.duration, &title.duration_units) {
        println!("Duration:  {duration} {units}");
    }
    if let Some(added) = title.netflix_date_added {
        println!("Added:     {added}");
    }

    for (label, names) in [
        ("Directors", &title.directors),
        ("Cast", &title.cast_members),
        ("Countries", &title.countries),
        ("Genres", &title.genres),
    ] {
        if !names.is_empty() {
            println!("{label:<10} {}", names.join(", "));
        }
    }

    if let Some(description) = &title.description {
        println!();
        println!("{description}");
    }

    println!();
    Ok(())
}

//! List titles command handler

use super::open_catalog;
use crate::cli::ListArgs;
use crate::config::Config;
use crate::models::{ListParams, Projection, TitleQuery};
use serde_json::Value;

pub async fn cmd_list_titles(config: &Config, args: ListArgs) -> anyhow::Result<()> {
    let params = ListParams {
        page: args.page,
        perpage: args.perpage,
        order_by: args.order_by,
        search: args.search,
        genre: args.genre,
        country: args.country,
        cast_member: args.cast_member,
        director: args.director,
        release_year: args.release_year,
        ..ListParams::default()
    };

    let (query, _) = match TitleQuery::from_params(&params, config.catalog.default_per_page) {
        Ok(parsed) => parsed,
        Err(e) => {
            println!("Invalid filter: {e}");
            return Ok(());
        }
    };

    let catalog = open_catalog(config).await?;
    let titles = catalog.list_titles(&query, &Projection::default()).await?;

    if titles.is_empty() {
        println!("No titles found.");
        return Ok(());
    }

    println!("Titles (page {}, {} shown)", query.page, titles.len());
    println!("{:-<70}", "");

    for fields in titles {
        let text = |key: &str| match fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "?".to_string(),
        };

        println!("• {} ({})", text("title"), text("release_year"));
        println!(
            "  ID: {} | Type: {} | Rating: {}",
            text("id"),
            text("title_type"),
            text("rating")
        );
    }

    Ok(())
}

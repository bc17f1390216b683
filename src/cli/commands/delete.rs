use super::{open_catalog, parse_title_id};
use crate::config::Config;
use crate::services::CatalogError;

pub async fn cmd_delete_title(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_title_id(id_str) else {
        println!("Invalid title ID: {id_str}");
        return Ok(());
    };

    let catalog = open_catalog(config).await?;
    match catalog.delete_title(id).await {
        Ok(title) => {
            println!(
                "✓ Deleted: {} (ID: {})",
                title.title.as_deref().unwrap_or("untitled"),
                title.id
            );
            Ok(())
        }
        Err(CatalogError::NotFound(_)) => {
            println!("Title with ID {id} not found.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

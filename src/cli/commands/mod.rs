mod delete;
mod import;
mod list;
mod show;
mod summary;

pub use delete::cmd_delete_title;
pub use import::cmd_import_titles;
pub use list::cmd_list_titles;
pub use show::cmd_show_title;
pub use summary::cmd_summary;

use crate::config::Config;
use crate::domain::TitleId;
use crate::services::CatalogService;
use crate::state::SharedState;
use std::sync::Arc;

async fn open_catalog(config: &Config) -> anyhow::Result<Arc<dyn CatalogService>> {
    let shared = SharedState::new(config.clone()).await?;
    Ok(shared.catalog)
}

fn parse_title_id(id_str: &str) -> Option<TitleId> {
    id_str
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(TitleId::new)
}

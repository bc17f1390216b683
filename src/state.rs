use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogService, SeaOrmCatalogService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub catalog: Arc<dyn CatalogService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let catalog: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone(), &config));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            catalog,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}

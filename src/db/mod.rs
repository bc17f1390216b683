use crate::domain::TitleType;
use crate::models::{TitleQuery, TitleRecord};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::related::InsertExhausted;
pub use repositories::summary::PartitionRow;
pub use repositories::title::NewTitle;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every SQLite memory connection is its own database
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn title_repo(&self) -> repositories::title::TitleRepository {
        repositories::title::TitleRepository::new(self.conn.clone())
    }

    fn summary_repo(&self) -> repositories::summary::SummaryRepository {
        repositories::summary::SummaryRepository::new(self.conn.clone())
    }

    pub async fn list_titles(&self, query: &TitleQuery) -> Result<Vec<TitleRecord>> {
        self.title_repo().list(query).await
    }

    pub async fn get_title(&self, id: i32) -> Result<Option<TitleRecord>> {
        self.title_repo().get(id).await
    }

    pub async fn create_title(&self, title: &NewTitle, max_attempts: u32) -> Result<TitleRecord> {
        self.title_repo().create(title, max_attempts).await
    }

    pub async fn update_title(
        &self,
        id: i32,
        title: &NewTitle,
        max_attempts: u32,
    ) -> Result<Option<TitleRecord>> {
        self.title_repo().update(id, title, max_attempts).await
    }

    pub async fn soft_delete_title(&self, id: i32) -> Result<Option<TitleRecord>> {
        self.title_repo().soft_delete(id).await
    }

    // ========== Aggregation ==========

    pub async fn active_title_count(&self) -> Result<u64> {
        self.summary_repo().active_title_count().await
    }

    pub async fn distinct_director_count(&self) -> Result<u64> {
        self.summary_repo().distinct_director_count().await
    }

    pub async fn distinct_cast_member_count(&self) -> Result<u64> {
        self.summary_repo().distinct_cast_member_count().await
    }

    pub async fn partition_rows(&self, title_type: TitleType) -> Result<Vec<PartitionRow>> {
        self.summary_repo().partition_rows(title_type).await
    }
}

//! `SeaORM` implementation of the `CatalogService` trait.

use crate::config::Config;
use crate::db::{NewTitle, Store};
use crate::domain::{DurationUnit, Rating, TitleId, TitleType};
use crate::models::{Projection, SummaryReport, TitleFields, TitleInput, TitleQuery, TitleRecord};
use crate::parser::alias::{self, Category};
use crate::services::cache::TtlCache;
use crate::services::catalog_service::{CatalogError, CatalogService};
use crate::services::stats::summarize_partition;
use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, info};

pub struct SeaOrmCatalogService {
    store: Store,
    max_insert_attempts: u32,
    list_cache: TtlCache<TitleQuery, Vec<TitleRecord>>,
    title_cache: TtlCache<i32, Option<TitleRecord>>,
    summary_cache: TtlCache<(), SummaryReport>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub fn new(store: Store, config: &Config) -> Self {
        let ttl = config.cache.ttl();
        Self {
            store,
            max_insert_attempts: config.catalog.max_insert_attempts,
            list_cache: TtlCache::new("list_titles", ttl),
            title_cache: TtlCache::new("get_title", ttl),
            summary_cache: TtlCache::new("summary", ttl),
        }
    }

    async fn compute_summary(&self) -> Result<SummaryReport, CatalogError> {
        let mut report = SummaryReport {
            title_count: self.store.active_title_count().await?,
            director_count: self.store.distinct_director_count().await?,
            cast_member_count: self.store.distinct_cast_member_count().await?,
            ..SummaryReport::default()
        };

        for title_type in [TitleType::Movie, TitleType::TvShow] {
            let rows = self.store.partition_rows(title_type).await?;
            debug!(
                partition = title_type.partition_label(),
                rows = rows.len(),
                "Summarizing partition"
            );
            let summary = summarize_partition(&rows);
            match title_type {
                TitleType::Movie => report.movies = summary,
                TitleType::TvShow => report.shows = summary,
            }
        }

        Ok(report)
    }
}

/// Parses an optional categorical field. Blank strings count as absent.
fn resolve_optional<T>(raw: Option<&str>) -> Result<Option<T>, CatalogError>
where
    T: FromStr<Err = alias::AliasError>,
{
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(CatalogError::from)
}

fn resolve_names(category: Category, raw: &[String]) -> Result<Vec<String>, CatalogError> {
    raw.iter()
        .map(|name| alias::resolve(category, name.trim()).map(str::to_string))
        .collect::<Result<_, _>>()
        .map_err(CatalogError::from)
}

/// Validates a write payload and resolves every categorical value. Unknown
/// aliases are hard failures on this path.
pub fn resolve_input(input: TitleInput) -> Result<NewTitle, CatalogError> {
    if input.netflix_show_id.trim().is_empty() {
        return Err(CatalogError::Validation(
            "netflix_show_id cannot be empty".to_string(),
        ));
    }

    let duration_units: Option<DurationUnit> = resolve_optional(input.duration_units.as_deref())?;
    if input.duration.is_some() != duration_units.is_some() {
        return Err(CatalogError::Validation(
            "duration and duration_units must be set together".to_string(),
        ));
    }
    if input.duration.is_some_and(i32::is_negative) {
        return Err(CatalogError::Validation(
            "duration cannot be negative".to_string(),
        ));
    }

    Ok(NewTitle {
        netflix_show_id: input.netflix_show_id,
        title_type: resolve_optional::<TitleType>(input.title_type.as_deref())?,
        title: input.title,
        netflix_date_added: input.netflix_date_added,
        release_year: input.release_year,
        rating: resolve_optional::<Rating>(input.rating.as_deref())?,
        duration: input.duration,
        duration_units,
        description: input.description,
        directors: input.directors,
        cast_members: input.cast_members,
        countries: resolve_names(Category::Country, &input.countries)?,
        genres: resolve_names(Category::Genre, &input.genres)?,
    })
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_titles(
        &self,
        query: &TitleQuery,
        projection: &Projection,
    ) -> Result<Vec<TitleFields>, CatalogError> {
        let records = self
            .list_cache
            .get_or_try_insert_with(query.clone(), || async {
                Ok::<_, CatalogError>(self.store.list_titles(query).await?)
            })
            .await?;

        Ok(records
            .iter()
            .map(|record| record.project(projection))
            .collect())
    }

    async fn get_title(&self, id: TitleId) -> Result<TitleRecord, CatalogError> {
        self.title_cache
            .get_or_try_insert_with(id.value(), || async {
                Ok::<_, CatalogError>(self.store.get_title(id.value()).await?)
            })
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn create_title(&self, input: TitleInput) -> Result<TitleRecord, CatalogError> {
        let new = resolve_input(input)?;
        let record = self
            .store
            .create_title(&new, self.max_insert_attempts)
            .await?;

        info!(title_id = %record.id, "Created title");
        Ok(record)
    }

    async fn update_title(
        &self,
        id: TitleId,
        input: TitleInput,
    ) -> Result<TitleRecord, CatalogError> {
        let new = resolve_input(input)?;
        let record = self
            .store
            .update_title(id.value(), &new, self.max_insert_attempts)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!(title_id = %id, "Updated title");
        Ok(record)
    }

    async fn delete_title(&self, id: TitleId) -> Result<TitleRecord, CatalogError> {
        let record = self
            .store
            .soft_delete_title(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!(title_id = %id, "Deleted title");
        Ok(record)
    }

    async fn summary(&self) -> Result<SummaryReport, CatalogError> {
        self.summary_cache
            .get_or_try_insert_with((), || self.compute_summary())
            .await
    }

    async fn invalidate_cache(&self) {
        self.list_cache.invalidate_all().await;
        self.title_cache.invalidate_all().await;
        self.summary_cache.invalidate_all().await;
        info!("Catalog cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TitleInput {
        TitleInput {
            netflix_show_id: "s42".to_string(),
            title_type: Some("MOVIE".to_string()),
            rating: Some("pg 13".to_string()),
            duration: Some(95),
            duration_units: Some("MINUTES".to_string()),
            countries: vec!["united states".to_string()],
            genres: vec!["anime".to_string()],
            ..TitleInput::default()
        }
    }

    #[test]
    fn test_resolve_input_canonicalizes_aliases() {
        let new = resolve_input(input()).unwrap();

        assert_eq!(new.title_type, Some(TitleType::Movie));
        assert_eq!(new.rating, Some(Rating::Pg13));
        assert_eq!(new.duration_units, Some(DurationUnit::Minutes));
        assert_eq!(new.countries, vec!["United States".to_string()]);
        assert_eq!(new.genres, vec!["Anime Series".to_string()]);
    }

    #[test]
    fn test_resolve_input_requires_duration_pair() {
        let mut missing_units = input();
        missing_units.duration_units = None;
        assert!(matches!(
            resolve_input(missing_units),
            Err(CatalogError::Validation(_))
        ));

        let mut missing_duration = input();
        missing_duration.duration = None;
        assert!(matches!(
            resolve_input(missing_duration),
            Err(CatalogError::Validation(_))
        ));

        let mut neither = input();
        neither.duration = None;
        neither.duration_units = None;
        assert!(resolve_input(neither).is_ok());
    }

    #[test]
    fn test_resolve_input_rejects_unknown_alias() {
        let mut bad = input();
        bad.genres.push("Space Westerns".to_string());

        assert!(matches!(
            resolve_input(bad),
            Err(CatalogError::UnknownAlias {
                category: Category::Genre,
                ..
            })
        ));
    }

    #[test]
    fn test_blank_categorical_is_absent() {
        let mut blank = input();
        blank.rating = Some("  ".to_string());
        assert_eq!(resolve_input(blank).unwrap().rating, None);
    }
}

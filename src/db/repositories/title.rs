use super::related::{
    self, InsertExhausted, NamedEntity, TitleLink, get_or_create_all, is_unique_violation,
    link_all, load_names, unlink_all,
};
use crate::constants::limits::{TITLE_ID_MAX, TITLE_ID_MIN};
use crate::domain::{DurationUnit, Rating, TitleId, TitleType};
use crate::entities::{prelude::*, title};
use crate::models::{TitleQuery, TitleRecord};
use crate::parser::alias::{self, Category};
use crate::parser::{FilterOperator, FilterParam};
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use rand::Rng;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Scalar fields and relation names of a title, with every categorical value
/// already resolved to its canonical form.
#[derive(Debug, Clone, Default)]
pub struct NewTitle {
    pub netflix_show_id: String,
    pub title_type: Option<TitleType>,
    pub title: Option<String>,
    pub netflix_date_added: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub rating: Option<Rating>,
    pub duration: Option<i32>,
    pub duration_units: Option<DurationUnit>,
    pub description: Option<String>,
    pub directors: Vec<String>,
    pub cast_members: Vec<String>,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
}

impl NewTitle {
    fn apply(&self, model: &mut title::ActiveModel) {
        model.netflix_show_id = Set(self.netflix_show_id.clone());
        model.title_type = Set(self.title_type);
        model.title = Set(self.title.clone());
        model.netflix_date_added = Set(self.netflix_date_added);
        model.release_year = Set(self.release_year);
        model.rating = Set(self.rating);
        model.duration = Set(self.duration);
        model.duration_units = Set(self.duration_units);
        model.description = Set(self.description.clone());
    }
}

struct LinkIds {
    directors: BTreeSet<i32>,
    cast_members: BTreeSet<i32>,
    countries: BTreeSet<i32>,
    genres: BTreeSet<i32>,
}

pub struct TitleRepository {
    conn: DatabaseConnection,
}

impl TitleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One page of active titles matching every filter in `query`.
    pub async fn list(&self, query: &TitleQuery) -> Result<Vec<TitleRecord>> {
        // SQLite binds LIMIT/OFFSET as i64
        let offset = query.offset();
        if offset > MAX_SQL_INTEGER {
            debug!(page = query.page, per_page = query.per_page, "Page lies past any result");
            return Ok(Vec::new());
        }

        let Some(condition) = self.filter_condition(query).await? else {
            return Ok(Vec::new());
        };

        let mut select = Title::find().filter(condition);
        for param in &query.order_by {
            let Some(column) = sortable_column(&param.field) else {
                debug!(field = %param.field, "Ignoring unknown order_by field");
                continue;
            };
            let order = if param.descending() {
                Order::Desc
            } else {
                Order::Asc
            };
            select = select.order_by(column, order);
        }

        let models = select
            .order_by_asc(title::Column::Id)
            .offset(offset)
            .limit(query.per_page.min(MAX_SQL_INTEGER))
            .all(&self.conn)
            .await?;

        Ok(materialize(&self.conn, models).await?)
    }

    /// Active title by id.
    pub async fn get(&self, id: i32) -> Result<Option<TitleRecord>> {
        let Some(model) = find_active(&self.conn, id).await? else {
            return Ok(None);
        };
        Ok(materialize(&self.conn, vec![model]).await?.pop())
    }

    pub async fn create(&self, new: &NewTitle, max_attempts: u32) -> Result<TitleRecord> {
        let txn = self.conn.begin().await?;

        let links = resolve_links(&txn, new, max_attempts).await?;
        let id = insert_with_fresh_id(&txn, new, max_attempts).await?;
        write_links(&txn, id, &links).await?;

        txn.commit().await?;

        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("Created title {id} could not be reloaded"))
    }

    /// Replaces every scalar field and relation of an active title.
    pub async fn update(
        &self,
        id: i32,
        new: &NewTitle,
        max_attempts: u32,
    ) -> Result<Option<TitleRecord>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = find_active(&txn, id).await? else {
            return Ok(None);
        };

        let links = resolve_links(&txn, new, max_attempts).await?;

        let mut model: title::ActiveModel = existing.into();
        new.apply(&mut model);
        model.modified = Set(Utc::now());
        model.update(&txn).await?;

        clear_links(&txn, id).await?;
        write_links(&txn, id, &links).await?;

        txn.commit().await?;

        self.get(id).await
    }

    /// Stamps `deleted` on an active title and returns its final state.
    pub async fn soft_delete(&self, id: i32) -> Result<Option<TitleRecord>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = find_active(&txn, id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut model: title::ActiveModel = existing.into();
        model.deleted = Set(Some(now));
        model.modified = Set(now);
        let deleted = model.update(&txn).await?;

        let record = materialize(&txn, vec![deleted]).await?.pop();
        txn.commit().await?;

        Ok(record)
    }

    /// `None` when some filter can match no title at all.
    async fn filter_condition(&self, query: &TitleQuery) -> Result<Option<Condition>> {
        let mut condition = Condition::all().add(title::Column::Deleted.is_null());

        let related = [
            (
                "genre",
                self.category_ids::<Genre>(Category::Genre, query.genre.as_ref())
                    .await?
                    .map(linked_to::<TitleGenre>),
            ),
            (
                "country",
                self.category_ids::<Country>(Category::Country, query.country.as_ref())
                    .await?
                    .map(linked_to::<TitleCountry>),
            ),
            (
                "cast_member",
                self.name_ids::<CastMember>(query.cast_member.as_ref())
                    .await?
                    .map(linked_to::<TitleCastMember>),
            ),
            (
                "director",
                self.name_ids::<Director>(query.director.as_ref())
                    .await?
                    .map(linked_to::<TitleDirector>),
            ),
        ];

        for (label, filter) in related {
            match filter {
                Some(LinkFilter::Nothing) => {
                    debug!(filter = label, "No related rows match, result is empty");
                    return Ok(None);
                }
                Some(LinkFilter::Titles(expr)) => condition = condition.add(expr),
                None => {}
            }
        }

        if let Some(expr) = query.release_year.as_ref().and_then(release_year_condition) {
            condition = condition.add(expr);
        }

        if let Some(expression) = query.search.as_deref().and_then(search_expression) {
            condition = condition.add(Expr::cust_with_values(
                r#""titles"."id" IN (SELECT rowid FROM title_search WHERE title_search MATCH ?)"#,
                [expression],
            ));
        }

        Ok(Some(condition))
    }

    /// Ids of the related row named by a categorical filter. Only `eq` applies.
    async fn category_ids<E>(
        &self,
        category: Category,
        filter: Option<&FilterParam<String>>,
    ) -> Result<Option<Vec<i32>>>
    where
        E: NamedEntity,
    {
        let Some(filter) = filter else {
            return Ok(None);
        };

        if filter.operator != FilterOperator::Equal {
            debug!(
                category = %category,
                operator = %filter.operator,
                "Ignoring unsupported operator"
            );
            return Ok(None);
        }

        let canonical = match alias::resolve(category, &filter.value) {
            Ok(canonical) => canonical,
            Err(err) => {
                debug!(error = %err, "Unresolved filter value");
                return Ok(Some(Vec::new()));
            }
        };

        Ok(Some(
            related::find_id_by_name::<E, _>(&self.conn, canonical)
                .await?
                .into_iter()
                .collect(),
        ))
    }

    /// Ids of every related row matching a name filter, exact for `eq` and
    /// substring for `like`.
    async fn name_ids<E>(&self, filter: Option<&FilterParam<String>>) -> Result<Option<Vec<i32>>>
    where
        E: NamedEntity,
    {
        let Some(filter) = filter else {
            return Ok(None);
        };

        let exact = match filter.operator {
            FilterOperator::Equal => true,
            FilterOperator::Like => false,
            other => {
                debug!(entity = E::LABEL, operator = %other, "Ignoring unsupported operator");
                return Ok(None);
            }
        };

        Ok(Some(
            related::find_ids_matching::<E, _>(&self.conn, &filter.value, exact).await?,
        ))
    }
}

const MAX_SQL_INTEGER: u64 = i64::MAX.unsigned_abs();

enum LinkFilter {
    Nothing,
    Titles(SimpleExpr),
}

fn linked_to<L: TitleLink>(ids: Vec<i32>) -> LinkFilter {
    if ids.is_empty() {
        LinkFilter::Nothing
    } else {
        LinkFilter::Titles(related::linked_to::<L>(ids))
    }
}

fn release_year_condition(filter: &FilterParam<i32>) -> Option<SimpleExpr> {
    let column = title::Column::ReleaseYear;
    let value = filter.value;
    match filter.operator {
        FilterOperator::Equal => Some(column.eq(value)),
        FilterOperator::GreaterThan => Some(column.gt(value)),
        FilterOperator::LessThan => Some(column.lt(value)),
        FilterOperator::GreaterThanOrEqual => Some(column.gte(value)),
        FilterOperator::LessThanOrEqual => Some(column.lte(value)),
        FilterOperator::Like => {
            debug!("Ignoring like operator on release_year");
            None
        }
    }
}

/// FTS5 query requiring every term. `+` joins terms just like a space. Terms
/// without any letter or digit are dropped since the tokenizer would reduce
/// them to nothing.
pub(crate) fn search_expression(terms: &[String]) -> Option<String> {
    let phrases: Vec<String> = terms
        .iter()
        .flat_map(|term| term.split('+'))
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    (!phrases.is_empty()).then(|| phrases.join(" AND "))
}

fn sortable_column(field: &str) -> Option<title::Column> {
    use title::Column;

    Some(match field {
        "id" => Column::Id,
        "netflix_show_id" => Column::NetflixShowId,
        "title_type" => Column::TitleType,
        "title" => Column::Title,
        "netflix_date_added" => Column::NetflixDateAdded,
        "release_year" => Column::ReleaseYear,
        "rating" => Column::Rating,
        "duration" => Column::Duration,
        "duration_units" => Column::DurationUnits,
        "description" => Column::Description,
        "created" => Column::Created,
        "modified" => Column::Modified,
        _ => return None,
    })
}

async fn find_active<C>(db: &C, id: i32) -> Result<Option<title::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Title::find_by_id(id)
        .filter(title::Column::Deleted.is_null())
        .one(db)
        .await
}

async fn insert_with_fresh_id(
    txn: &DatabaseTransaction,
    new: &NewTitle,
    max_attempts: u32,
) -> Result<i32> {
    let now = Utc::now();

    for attempt in 1..=max_attempts {
        let id = rand::rng().random_range(TITLE_ID_MIN..=TITLE_ID_MAX);

        let mut model = title::ActiveModel {
            id: Set(id),
            created: Set(now),
            modified: Set(now),
            deleted: Set(None),
            ..Default::default()
        };
        new.apply(&mut model);

        let savepoint = txn.begin().await?;
        match Title::insert(model).exec_without_returning(&savepoint).await {
            Ok(_) => {
                savepoint.commit().await?;
                return Ok(id);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                warn!(id, attempt, "Generated title id already taken, retrying");
                metrics::counter!("catalog_insert_retries_total", "entity" => "title")
                    .increment(1);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(InsertExhausted {
        entity: "title",
        attempts: max_attempts,
    }
    .into())
}

async fn resolve_links(
    txn: &DatabaseTransaction,
    new: &NewTitle,
    max_attempts: u32,
) -> Result<LinkIds> {
    Ok(LinkIds {
        directors: get_or_create_all::<Director>(txn, &new.directors, max_attempts).await?,
        cast_members: get_or_create_all::<CastMember>(txn, &new.cast_members, max_attempts)
            .await?,
        countries: get_or_create_all::<Country>(txn, &new.countries, max_attempts).await?,
        genres: get_or_create_all::<Genre>(txn, &new.genres, max_attempts).await?,
    })
}

async fn write_links<C>(db: &C, title_id: i32, links: &LinkIds) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    link_all::<TitleDirector, _>(db, title_id, &links.directors).await?;
    link_all::<TitleCastMember, _>(db, title_id, &links.cast_members).await?;
    link_all::<TitleCountry, _>(db, title_id, &links.countries).await?;
    link_all::<TitleGenre, _>(db, title_id, &links.genres).await
}

async fn clear_links<C>(db: &C, title_id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    unlink_all::<TitleDirector, _>(db, title_id).await?;
    unlink_all::<TitleCastMember, _>(db, title_id).await?;
    unlink_all::<TitleCountry, _>(db, title_id).await?;
    unlink_all::<TitleGenre, _>(db, title_id).await
}

/// Attaches relation names to each model, preserving model order.
async fn materialize<C>(db: &C, models: Vec<title::Model>) -> Result<Vec<TitleRecord>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let mut directors = load_names::<TitleDirector, _>(db, &ids).await?;
    let mut cast_members = load_names::<TitleCastMember, _>(db, &ids).await?;
    let mut countries = load_names::<TitleCountry, _>(db, &ids).await?;
    let mut genres = load_names::<TitleGenre, _>(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| TitleRecord {
            id: TitleId::new(m.id),
            netflix_show_id: m.netflix_show_id,
            title_type: m.title_type.map(|t| t.to_string()),
            title: m.title,
            directors: directors.remove(&m.id).unwrap_or_default(),
            cast_members: cast_members.remove(&m.id).unwrap_or_default(),
            countries: countries.remove(&m.id).unwrap_or_default(),
            netflix_date_added: m.netflix_date_added,
            release_year: m.release_year,
            rating: m.rating.map(|r| r.to_string()),
            duration: m.duration,
            duration_units: m.duration_units.map(|u| u.to_string()),
            genres: genres.remove(&m.id).unwrap_or_default(),
            description: m.description,
            created: m.created,
            modified: m.modified,
            deleted: m.deleted,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_search_expression_joins_terms_with_and() {
        assert_eq!(
            search_expression(&terms(&["jordan", "peele"])).as_deref(),
            Some(r#""jordan" AND "peele""#)
        );
    }

    #[test]
    fn test_search_expression_drops_symbol_only_terms() {
        assert_eq!(
            search_expression(&terms(&["+", "ghost"])).as_deref(),
            Some(r#""ghost""#)
        );
        assert_eq!(search_expression(&terms(&["+", "++"])), None);
    }

    #[test]
    fn test_search_expression_splits_on_plus() {
        assert_eq!(
            search_expression(&terms(&["star+wars", "rebels"])).as_deref(),
            Some(r#""star" AND "wars" AND "rebels""#)
        );
        assert_eq!(
            search_expression(&terms(&["+dune+"])).as_deref(),
            Some(r#""dune""#)
        );
    }

    #[test]
    fn test_sortable_columns() {
        assert!(matches!(
            sortable_column("release_year"),
            Some(title::Column::ReleaseYear)
        ));
        assert!(sortable_column("directors").is_none());
        assert!(sortable_column("nonsense").is_none());
    }

    #[test]
    fn test_release_year_like_is_skipped() {
        let like = FilterParam {
            operator: FilterOperator::Like,
            value: 2005,
        };
        assert!(release_year_condition(&like).is_none());

        let geq = FilterParam {
            operator: FilterOperator::GreaterThanOrEqual,
            value: 2005,
        };
        assert!(release_year_condition(&geq).is_some());
    }
}

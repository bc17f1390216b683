//! Named entities shared across titles (directors, cast members, countries,
//! genres) and the join tables linking them to titles.

use crate::entities::{
    cast_member, country, director, genre, prelude::*, title, title_cast_member, title_country,
    title_director, title_genre,
};
use anyhow::Result;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, sea_query::SimpleExpr,
};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::warn;

/// Raised when every insert attempt collided with a uniqueness constraint.
#[derive(Debug, Error)]
#[error("Failed to insert {entity} after {attempts} attempts")]
pub struct InsertExhausted {
    pub entity: &'static str,
    pub attempts: u32,
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// A table of bare names with a surrogate integer key.
pub trait NamedEntity: EntityTrait {
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn new_row(name: &str) -> Self::ActiveModel;
}

/// A join table between titles and one kind of named entity.
pub trait TitleLink: EntityTrait {
    type Named: NamedEntity;

    fn title_column() -> Self::Column;
    fn related_column() -> Self::Column;
    fn link(title_id: i32, related_id: i32) -> Self::ActiveModel;
}

macro_rules! named_entity {
    ($module:ident, $entity:ty, $label:literal) => {
        impl NamedEntity for $entity {
            const LABEL: &'static str = $label;

            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn name_column() -> Self::Column {
                $module::Column::Name
            }

            fn new_row(name: &str) -> Self::ActiveModel {
                $module::ActiveModel {
                    name: Set(name.to_string()),
                    ..Default::default()
                }
            }
        }
    };
}

named_entity!(director, Director, "director");
named_entity!(cast_member, CastMember, "cast_member");
named_entity!(country, Country, "country");
named_entity!(genre, Genre, "genre");

macro_rules! title_link {
    ($module:ident, $entity:ty, $named:ty, $column:ident, $field:ident) => {
        impl TitleLink for $entity {
            type Named = $named;

            fn title_column() -> Self::Column {
                $module::Column::TitleId
            }

            fn related_column() -> Self::Column {
                $module::Column::$column
            }

            fn link(title_id: i32, related_id: i32) -> Self::ActiveModel {
                $module::ActiveModel {
                    title_id: Set(title_id),
                    $field: Set(related_id),
                }
            }
        }
    };
}

/// Lowest id carrying exactly this name. Duplicate names can exist for
/// directors and cast members.
pub async fn find_id_by_name<E, C>(db: &C, name: &str) -> Result<Option<i32>, DbErr>
where
    E: NamedEntity,
    C: ConnectionTrait,
{
    E::find()
        .select_only()
        .column(E::id_column())
        .filter(E::name_column().eq(name))
        .order_by_asc(E::id_column())
        .into_tuple::<i32>()
        .one(db)
        .await
}

/// Every id whose name matches. `exact` compares whole names, otherwise the
/// value is matched as a substring.
pub async fn find_ids_matching<E, C>(db: &C, value: &str, exact: bool) -> Result<Vec<i32>, DbErr>
where
    E: NamedEntity,
    C: ConnectionTrait,
{
    let condition = if exact {
        E::name_column().eq(value)
    } else {
        E::name_column().contains(value)
    };

    E::find()
        .select_only()
        .column(E::id_column())
        .filter(condition)
        .into_tuple::<i32>()
        .all(db)
        .await
}

/// Looks the name up and inserts it when missing. Each insert runs in its own
/// savepoint so a collision with a concurrent writer only rolls back that
/// attempt; the next round picks up the winner's row.
pub async fn get_or_create<E>(txn: &DatabaseTransaction, name: &str, max_attempts: u32) -> Result<i32>
where
    E: NamedEntity,
{
    for attempt in 1..=max_attempts {
        if let Some(id) = find_id_by_name::<E, _>(txn, name).await? {
            return Ok(id);
        }

        let savepoint = txn.begin().await?;
        match E::insert(E::new_row(name)).exec(&savepoint).await {
            Ok(_) => {
                savepoint.commit().await?;
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                warn!(
                    entity = E::LABEL,
                    name = %name,
                    attempt,
                    "Insert collided with an existing row, retrying"
                );
                metrics::counter!("catalog_insert_retries_total", "entity" => E::LABEL)
                    .increment(1);
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(id) = find_id_by_name::<E, _>(txn, name).await? {
            return Ok(id);
        }
    }

    Err(InsertExhausted {
        entity: E::LABEL,
        attempts: max_attempts,
    }
    .into())
}

/// Resolves every name to an id, creating missing rows. Result is
/// deduplicated so each id links to the title once.
pub async fn get_or_create_all<E>(
    txn: &DatabaseTransaction,
    names: &[String],
    max_attempts: u32,
) -> Result<BTreeSet<i32>>
where
    E: NamedEntity,
{
    let mut ids = BTreeSet::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        ids.insert(get_or_create::<E>(txn, name, max_attempts).await?);
    }
    Ok(ids)
}

pub async fn link_all<L, C>(db: &C, title_id: i32, related_ids: &BTreeSet<i32>) -> Result<(), DbErr>
where
    L: TitleLink,
    L::Model: IntoActiveModel<L::ActiveModel>,
    C: ConnectionTrait,
{
    if related_ids.is_empty() {
        return Ok(());
    }

    L::insert_many(related_ids.iter().map(|&id| L::link(title_id, id)))
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn unlink_all<L, C>(db: &C, title_id: i32) -> Result<(), DbErr>
where
    L: TitleLink,
    C: ConnectionTrait,
{
    L::delete_many()
        .filter(L::title_column().eq(title_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Names linked to each title, sorted per title.
pub async fn load_names<L, C>(db: &C, title_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>, DbErr>
where
    L: TitleLink,
    C: ConnectionTrait,
{
    if title_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let pairs: Vec<(i32, i32)> = L::find()
        .select_only()
        .column(L::title_column())
        .column(L::related_column())
        .filter(L::title_column().is_in(title_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;

    let related_ids: BTreeSet<i32> = pairs.iter().map(|(_, related)| *related).collect();
    let names: HashMap<i32, String> = L::Named::find()
        .select_only()
        .column(<L::Named as NamedEntity>::id_column())
        .column(<L::Named as NamedEntity>::name_column())
        .filter(<L::Named as NamedEntity>::id_column().is_in(related_ids))
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut by_title: HashMap<i32, Vec<String>> = HashMap::new();
    for (title_id, related_id) in pairs {
        if let Some(name) = names.get(&related_id) {
            by_title.entry(title_id).or_default().push(name.clone());
        }
    }
    for names in by_title.values_mut() {
        names.sort();
    }

    Ok(by_title)
}

/// `titles.id IN (SELECT title_id FROM <link> WHERE <related> IN (..))`.
pub fn linked_to<L>(related_ids: Vec<i32>) -> SimpleExpr
where
    L: TitleLink,
{
    title::Column::Id.in_subquery(
        Query::select()
            .column(L::title_column())
            .from(L::default())
            .and_where(L::related_column().is_in(related_ids))
            .to_owned(),
    )
}

/// Distinct names among entities linked to at least one active title.
pub async fn count_distinct_active_names<L, C>(db: &C) -> Result<u64, DbErr>
where
    L: TitleLink,
    <L::Named as EntityTrait>::Model: Sync,
    C: ConnectionTrait,
{
    let active_links = Query::select()
        .column((L::default(), L::related_column()))
        .from(L::default())
        .inner_join(
            Title,
            Expr::col((Title, title::Column::Id)).equals((L::default(), L::title_column())),
        )
        .and_where(Expr::col((Title, title::Column::Deleted)).is_null())
        .to_owned();

    L::Named::find()
        .select_only()
        .column(<L::Named as NamedEntity>::name_column())
        .distinct()
        .filter(<L::Named as NamedEntity>::id_column().in_subquery(active_links))
        .count(db)
        .await
}

title_link!(title_director, TitleDirector, Director, DirectorId, director_id);
title_link!(title_cast_member, TitleCastMember, CastMember, CastMemberId, cast_member_id);
title_link!(title_country, TitleCountry, Country, CountryId, country_id);
title_link!(title_genre, TitleGenre, Genre, GenreId, genre_id);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn test_linked_to_builds_subquery() {
        let sql = Title::find()
            .filter(linked_to::<TitleGenre>(vec![3, 7]))
            .build(DatabaseBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#""titles"."id" IN (SELECT "title_id" FROM "title_genres""#));
        assert!(sql.contains(r#""genre_id" IN (3, 7)"#));
    }

    async fn store() -> crate::db::Store {
        crate::db::Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing_row() {
        let store = store().await;
        let txn = store.conn.begin().await.unwrap();

        let first = get_or_create::<Genre>(&txn, "Dramas", 3).await.unwrap();
        let second = get_or_create::<Genre>(&txn, "Dramas", 3).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(Genre::find().count(&store.conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_gives_up_after_repeated_collisions() {
        let store = store().await;
        // Lookups compare exactly but this index rejects any case variant,
        // so every insert attempt collides.
        store
            .conn
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_genres_name_nocase ON genres (name COLLATE NOCASE)",
            )
            .await
            .unwrap();
        Genre::insert(Genre::new_row("dramas"))
            .exec(&store.conn)
            .await
            .unwrap();

        let txn = store.conn.begin().await.unwrap();
        let err = get_or_create::<Genre>(&txn, "Dramas", 3)
            .await
            .unwrap_err();

        let exhausted = err.downcast_ref::<InsertExhausted>().unwrap();
        assert_eq!(exhausted.entity, "genre");
        assert_eq!(exhausted.attempts, 3);

        // The failed savepoints left the outer transaction usable
        let id = get_or_create::<Genre>(&txn, "Comedies", 3).await.unwrap();
        assert!(id > 0);
    }

    #[test]
    fn test_link_rows_carry_both_keys() {
        let link = <TitleDirector as TitleLink>::link(123_456_789, 4);
        assert_eq!(link.title_id, Set(123_456_789));
        assert_eq!(link.director_id, Set(4));
    }
}

//! Domain types for the title catalog.
//!
//! The scalar categorical columns are stored as string-backed active enums;
//! each renders as its bare canonical name and parses through the alias
//! resolver, so every spelling the resolver accepts lands on the same variant.

use crate::parser::alias::{self, AliasError, Category};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a title.
///
/// # Examples
///
/// ```rust
/// use flixdex::domain::TitleId;
///
/// let id = TitleId::new(123_456_789);
/// assert_eq!(id.value(), 123_456_789);
/// assert_eq!(id.to_string(), "123456789");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TitleId(i32);

impl TitleId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TitleId> for i32 {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

impl From<i32> for TitleId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TitleType {
    #[sea_orm(string_value = "movie")]
    Movie,
    #[sea_orm(string_value = "tv_show")]
    TvShow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Rating {
    #[sea_orm(string_value = "G")]
    G,
    #[sea_orm(string_value = "NC-17")]
    Nc17,
    #[sea_orm(string_value = "NR")]
    Nr,
    #[sea_orm(string_value = "PG")]
    Pg,
    #[sea_orm(string_value = "PG-13")]
    Pg13,
    #[sea_orm(string_value = "R")]
    R,
    #[sea_orm(string_value = "TV-14")]
    Tv14,
    #[sea_orm(string_value = "TV-G")]
    TvG,
    #[sea_orm(string_value = "TV-MA")]
    TvMa,
    #[sea_orm(string_value = "TV-PG")]
    TvPg,
    #[sea_orm(string_value = "TV-Y")]
    TvY,
    #[sea_orm(string_value = "TV-Y7")]
    TvY7,
    #[sea_orm(string_value = "TV-Y7-FV")]
    TvY7Fv,
    #[sea_orm(string_value = "UR")]
    Ur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DurationUnit {
    #[sea_orm(string_value = "minutes")]
    Minutes,
    #[sea_orm(string_value = "seasons")]
    Seasons,
}

fn from_alias<E>(category: Category, raw: &str) -> Result<E, AliasError>
where
    E: ActiveEnum<Value = String>,
{
    let canonical = alias::resolve(category, raw)?;
    E::try_from_value(&canonical.to_string()).map_err(|_| AliasError::Unknown {
        category,
        value: raw.to_string(),
    })
}

macro_rules! categorical {
    ($ty:ty, $category:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_value())
            }
        }

        impl FromStr for $ty {
            type Err = AliasError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                from_alias($category, s)
            }
        }
    };
}

categorical!(TitleType, Category::TitleType);
categorical!(Rating, Category::Rating);
categorical!(DurationUnit, Category::DurationUnit);

impl TitleType {
    #[must_use]
    pub const fn partition_label(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::TvShow => "shows",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_display_is_bare_canonical_name() {
        assert_eq!(TitleType::TvShow.to_string(), "tv_show");
        assert_eq!(Rating::TvY7Fv.to_string(), "TV-Y7-FV");
        assert_eq!(Rating::Pg13.to_string(), "PG-13");
        assert_eq!(DurationUnit::Seasons.to_string(), "seasons");
    }

    #[test]
    fn test_parse_through_aliases() {
        assert_eq!("MOVIE".parse::<TitleType>(), Ok(TitleType::Movie));
        assert_eq!("pg 13".parse::<Rating>(), Ok(Rating::Pg13));
        assert_eq!("nc17".parse::<Rating>(), Ok(Rating::Nc17));
        assert_eq!("MINUTES".parse::<DurationUnit>(), Ok(DurationUnit::Minutes));
        assert!("episodes".parse::<DurationUnit>().is_err());
    }

    #[test]
    fn test_every_rating_round_trips_through_display() {
        for rating in Rating::iter() {
            assert_eq!(rating.to_string().parse::<Rating>(), Ok(rating));
        }
    }
}

use crate::domain::TitleId;
use crate::parser::{self, FilterError, FilterParam, OrderByParam};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Field map of a projected title, in wire form.
pub type TitleFields = serde_json::Map<String, serde_json::Value>;

/// A materialized title with its relations flattened to bare names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: TitleId,
    pub netflix_show_id: String,
    pub title_type: Option<String>,
    pub title: Option<String>,
    pub directors: Vec<String>,
    pub cast_members: Vec<String>,
    pub countries: Vec<String>,
    pub netflix_date_added: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<i32>,
    pub duration_units: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DateTime<Utc>>,
}

impl TitleRecord {
    /// Applies a projection and drops null fields.
    #[must_use]
    pub fn project(&self, projection: &Projection) -> TitleFields {
        let serde_json::Value::Object(fields) = serde_json::to_value(self).unwrap_or_default()
        else {
            return TitleFields::new();
        };

        fields
            .into_iter()
            .filter(|(key, value)| !value.is_null() && projection.keeps(key))
            .collect()
    }
}

/// Write payload for create and update. Categorical values may be any alias
/// the resolver accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleInput {
    pub netflix_show_id: String,
    #[serde(default)]
    pub title_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "director")]
    pub directors: Vec<String>,
    #[serde(default)]
    pub cast_members: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub netflix_date_added: Option<NaiveDate>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub duration_units: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Include/exclude field sets. `None` means the set was not given at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Projection {
    pub include: Option<BTreeSet<String>>,
    pub exclude: Option<BTreeSet<String>>,
}

impl Projection {
    #[must_use]
    pub fn keeps(&self, field: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|include| include.contains(field));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.contains(field));
        included && !excluded
    }
}

/// Raw listing parameters as they arrive from a query string or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub perpage: Option<u64>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub order_by: Option<String>,
    pub search: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub cast_member: Option<String>,
    pub director: Option<String>,
    pub release_year: Option<String>,
}

/// Fully parsed listing request. Doubles as the result cache key, so every
/// field takes part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleQuery {
    pub page: u64,
    pub per_page: u64,
    pub order_by: Vec<OrderByParam>,
    pub search: Option<Vec<String>>,
    pub genre: Option<FilterParam<String>>,
    pub country: Option<FilterParam<String>>,
    pub cast_member: Option<FilterParam<String>>,
    pub director: Option<FilterParam<String>>,
    pub release_year: Option<FilterParam<i32>>,
}

impl TitleQuery {
    /// Parses everything except the projection, which is applied after the
    /// fetch and kept out of the cache key.
    pub fn from_params(
        params: &ListParams,
        default_per_page: u64,
    ) -> Result<(Self, Projection), FilterError> {
        let query = Self {
            page: params.page.unwrap_or(1),
            per_page: params.perpage.unwrap_or(default_per_page),
            order_by: parser::parse_order_by(params.order_by.as_deref()),
            search: parser::parse_search(params.search.as_deref())?,
            genre: parser::parse_text_filter(params.genre.as_deref())?,
            country: parser::parse_text_filter(params.country.as_deref())?,
            cast_member: parser::parse_text_filter(params.cast_member.as_deref())?,
            director: parser::parse_text_filter(params.director.as_deref())?,
            release_year: parser::parse_integer_filter(params.release_year.as_deref())?,
        };

        let projection = Projection {
            include: parser::parse_delimited(params.include.as_deref()),
            exclude: parser::parse_delimited(params.exclude.as_deref()),
        };

        Ok((query, projection))
    }

    /// Row offset of the first title on the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for TitleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: crate::constants::limits::DEFAULT_PER_PAGE,
            order_by: Vec::new(),
            search: None,
            genre: None,
            country: None,
            cast_member: None,
            director: None,
            release_year: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{FilterOperator, SortDirection};

    fn record() -> TitleRecord {
        let now = Utc::now();
        TitleRecord {
            id: TitleId::new(123_456_789),
            netflix_show_id: "s1".to_string(),
            title_type: Some("movie".to_string()),
            title: Some("Get Out".to_string()),
            directors: vec!["Jordan Peele".to_string()],
            cast_members: vec![],
            countries: vec!["United States".to_string()],
            netflix_date_added: None,
            release_year: Some(2017),
            rating: Some("R".to_string()),
            duration: Some(104),
            duration_units: Some("minutes".to_string()),
            genres: vec!["Horror Movies".to_string()],
            description: None,
            created: now,
            modified: now,
            deleted: None,
        }
    }

    fn set(fields: &[&str]) -> Option<BTreeSet<String>> {
        Some(fields.iter().map(|f| (*f).to_string()).collect())
    }

    #[test]
    fn test_unset_projection_keeps_all_non_null_fields() {
        let fields = record().project(&Projection::default());
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("directors"));
        assert!(fields.contains_key("cast_members"));
        assert!(!fields.contains_key("description"));
        assert!(!fields.contains_key("deleted"));
    }

    #[test]
    fn test_include_and_exclude_same_field_is_empty() {
        let projection = Projection {
            include: set(&["title"]),
            exclude: set(&["title"]),
        };
        assert!(record().project(&projection).is_empty());
    }

    #[test]
    fn test_exclude_only_subtracts_from_all_fields() {
        let projection = Projection {
            include: None,
            exclude: set(&["description", "genres", "id"]),
        };
        let fields = record().project(&projection);
        assert!(!fields.contains_key("genres"));
        assert!(!fields.contains_key("id"));
        assert!(fields.contains_key("rating"));
    }

    #[test]
    fn test_empty_include_set_is_not_unset() {
        let projection = Projection {
            include: set(&[]),
            exclude: None,
        };
        assert!(record().project(&projection).is_empty());
    }

    #[test]
    fn test_query_from_params() {
        let params = ListParams {
            page: Some(2),
            order_by: Some("title:desc,release_year".to_string()),
            release_year: Some("gt:2005".to_string()),
            director: Some("like:peele".to_string()),
            include: Some("title, release_year".to_string()),
            ..Default::default()
        };
        let (query, projection) = TitleQuery::from_params(&params, 10).unwrap();

        assert_eq!(query.offset(), 10);
        assert_eq!(query.order_by[0].direction, SortDirection::Descending);
        assert_eq!(
            query.release_year,
            Some(FilterParam {
                operator: FilterOperator::GreaterThan,
                value: 2005
            })
        );
        assert_eq!(
            query.director.map(|d| d.operator),
            Some(FilterOperator::Like)
        );
        assert_eq!(projection.include, set(&["title", "release_year"]));
        assert_eq!(projection.exclude, None);
    }

    #[test]
    fn test_query_from_params_rejects_bad_search() {
        let params = ListParams {
            search: Some("DROP TABLE titles".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            TitleQuery::from_params(&params, 10),
            Err(FilterError::InvalidSearchParameter(_))
        ));
    }
}

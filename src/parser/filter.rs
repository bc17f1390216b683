//! Parsing of the loosely structured listing parameters: delimited field sets,
//! sort specs, free-text search strings and `operator:value` filters.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::limits::{SEARCH_MAX_LEN, SEARCH_MIN_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid search parameter: {0}")]
    InvalidSearchParameter(String),

    #[error("Invalid filter operator: '{0}'")]
    InvalidFilterOperator(String),

    #[error("Invalid filter value '{value}': {reason}")]
    InvalidFilterValue { value: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equal,
    Like,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl FilterOperator {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::Like => "like",
            Self::GreaterThan => "gt",
            Self::LessThan => "lt",
            Self::GreaterThanOrEqual => "geq",
            Self::LessThanOrEqual => "leq",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Equal),
            "like" => Ok(Self::Like),
            "gt" => Ok(Self::GreaterThan),
            "lt" => Ok(Self::LessThan),
            "geq" => Ok(Self::GreaterThanOrEqual),
            "leq" => Ok(Self::LessThanOrEqual),
            other => Err(FilterError::InvalidFilterOperator(other.to_string())),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterParam<T> {
    pub operator: FilterOperator,
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderByParam {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderByParam {
    #[must_use]
    pub const fn descending(&self) -> bool {
        matches!(self.direction, SortDirection::Descending)
    }
}

/// `None` stays unset, which callers must keep distinct from an empty set.
#[must_use]
pub fn parse_delimited(s: Option<&str>) -> Option<BTreeSet<String>> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect()
    })
}

#[must_use]
pub fn parse_order_by(s: Option<&str>) -> Vec<OrderByParam> {
    let Some(s) = s else {
        return Vec::new();
    };

    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_suffix(":desc") {
            Some(field) => OrderByParam {
                field: field.to_string(),
                direction: SortDirection::Descending,
            },
            None => OrderByParam {
                field: part.to_string(),
                direction: SortDirection::Ascending,
            },
        })
        .collect()
}

fn search_allow_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\p{L}\p{N}\s+]{2,100}$").expect("Invalid regex"))
}

fn search_deny_patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)SELECT\s+\*\s+FROM",
            r"(?i)INSERT\s+INTO",
            r"(?i)DROP\s+(TABLE|DATABASE)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect()
    })
}

/// Heuristic screening only. Queries stay parameterized regardless.
pub fn parse_search(s: Option<&str>) -> Result<Option<Vec<String>>, FilterError> {
    let Some(s) = s else {
        return Ok(None);
    };

    let len = s.chars().count();
    if !(SEARCH_MIN_LEN..=SEARCH_MAX_LEN).contains(&len) {
        return Err(FilterError::InvalidSearchParameter(format!(
            "search must be between {SEARCH_MIN_LEN} and {SEARCH_MAX_LEN} characters"
        )));
    }

    if !search_allow_pattern().is_match(s) {
        return Err(FilterError::InvalidSearchParameter(
            "search may only contain letters, numbers, spaces and '+'".to_string(),
        ));
    }

    if search_deny_patterns().iter().any(|re| re.is_match(s)) {
        return Err(FilterError::InvalidSearchParameter(
            "search contains a forbidden pattern".to_string(),
        ));
    }

    Ok(Some(
        s.split(' ')
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

/// Splits on the first `:`. Without one the whole input is the value and the
/// operator is `eq`.
pub fn parse_filter_parameter<T, F>(
    s: Option<&str>,
    postprocess: F,
) -> Result<Option<FilterParam<T>>, FilterError>
where
    F: FnOnce(&str) -> Result<T, FilterError>,
{
    let Some(s) = s else {
        return Ok(None);
    };

    let (operator, raw) = match s.split_once(':') {
        Some((token, value)) => (token.parse::<FilterOperator>()?, value),
        None => (FilterOperator::Equal, s),
    };

    Ok(Some(FilterParam {
        operator,
        value: postprocess(raw)?,
    }))
}

pub fn parse_text_filter(s: Option<&str>) -> Result<Option<FilterParam<String>>, FilterError> {
    parse_filter_parameter(s, |raw| Ok(raw.to_string()))
}

pub fn parse_integer_filter(s: Option<&str>) -> Result<Option<FilterParam<i32>>, FilterError> {
    parse_filter_parameter(s, |raw| {
        raw.trim()
            .parse::<i32>()
            .map_err(|e| FilterError::InvalidFilterValue {
                value: raw.to_string(),
                reason: e.to_string(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimited() {
        assert_eq!(parse_delimited(None), None);

        let fields = parse_delimited(Some("title, release_year ,rating")).unwrap();
        let expected: BTreeSet<String> = ["title", "release_year", "rating"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(fields, expected);

        assert_eq!(parse_delimited(Some("")), Some(BTreeSet::new()));
    }

    #[test]
    fn test_parse_order_by_preserves_order() {
        let order = parse_order_by(Some("title:desc,release_year"));
        assert_eq!(
            order,
            vec![
                OrderByParam {
                    field: "title".to_string(),
                    direction: SortDirection::Descending,
                },
                OrderByParam {
                    field: "release_year".to_string(),
                    direction: SortDirection::Ascending,
                },
            ]
        );
        assert!(order[0].descending());
        assert!(parse_order_by(None).is_empty());
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            parse_search(Some("jordan peele")).unwrap(),
            Some(vec!["jordan".to_string(), "peele".to_string()])
        );
        assert_eq!(parse_search(None).unwrap(), None);
        assert_eq!(
            parse_search(Some("star+wars")).unwrap(),
            Some(vec!["star+wars".to_string()])
        );
    }

    #[test]
    fn test_parse_search_rejects_bad_input() {
        assert!(matches!(
            parse_search(Some("a")),
            Err(FilterError::InvalidSearchParameter(_))
        ));
        assert!(parse_search(Some(&"a".repeat(51))).is_err());
        assert!(parse_search(Some(&"a".repeat(50))).is_ok());
        assert!(parse_search(Some("DROP TABLE titles")).is_err());
        assert!(parse_search(Some("drop database x")).is_err());
        assert!(parse_search(Some("insert into titles")).is_err());
        assert!(parse_search(Some("SELECT * FROM titles")).is_err());
        assert!(parse_search(Some("robert'); --")).is_err());
    }

    #[test]
    fn test_parse_filter_parameter() {
        assert_eq!(
            parse_integer_filter(Some("gt:2005")).unwrap(),
            Some(FilterParam {
                operator: FilterOperator::GreaterThan,
                value: 2005,
            })
        );
        assert_eq!(
            parse_integer_filter(Some("2005")).unwrap(),
            Some(FilterParam {
                operator: FilterOperator::Equal,
                value: 2005,
            })
        );
        assert_eq!(
            parse_text_filter(Some("like:Jordan: Peele")).unwrap(),
            Some(FilterParam {
                operator: FilterOperator::Like,
                value: "Jordan: Peele".to_string(),
            })
        );
        assert_eq!(parse_text_filter(None).unwrap(), None);
    }

    #[test]
    fn test_parse_filter_parameter_errors() {
        assert_eq!(
            parse_text_filter(Some("between:1")),
            Err(FilterError::InvalidFilterOperator("between".to_string()))
        );
        assert!(matches!(
            parse_integer_filter(Some("geq:twenty")),
            Err(FilterError::InvalidFilterValue { .. })
        ));
    }
}

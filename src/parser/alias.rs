//! Canonical value lookup for categorical title attributes.
//!
//! Every category owns an alias table generated once from its canonical value
//! list. Lookups are exact matches against that table.

use crate::constants::canonical;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Genre,
    Country,
    Rating,
    TitleType,
    DurationUnit,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Genre,
        Self::Country,
        Self::Rating,
        Self::TitleType,
        Self::DurationUnit,
    ];

    #[must_use]
    pub const fn canonical_values(self) -> &'static [&'static str] {
        match self {
            Self::Genre => canonical::GENRES,
            Self::Country => canonical::COUNTRIES,
            Self::Rating => canonical::RATINGS,
            Self::TitleType => canonical::TITLE_TYPES,
            Self::DurationUnit => canonical::DURATION_UNITS,
        }
    }

    const fn extra_aliases(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Genre => canonical::GENRE_EXTRA_ALIASES,
            _ => &[],
        }
    }

    fn table(self) -> &'static AliasTable {
        static GENRE: OnceLock<AliasTable> = OnceLock::new();
        static COUNTRY: OnceLock<AliasTable> = OnceLock::new();
        static RATING: OnceLock<AliasTable> = OnceLock::new();
        static TITLE_TYPE: OnceLock<AliasTable> = OnceLock::new();
        static DURATION_UNIT: OnceLock<AliasTable> = OnceLock::new();

        let cell = match self {
            Self::Genre => &GENRE,
            Self::Country => &COUNTRY,
            Self::Rating => &RATING,
            Self::TitleType => &TITLE_TYPE,
            Self::DurationUnit => &DURATION_UNIT,
        };
        cell.get_or_init(|| AliasTable::build(self.canonical_values(), self.extra_aliases()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Genre => "genre",
            Self::Country => "country",
            Self::Rating => "rating",
            Self::TitleType => "title_type",
            Self::DurationUnit => "duration_unit",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("Unknown {category} value: '{value}'")]
    Unknown { category: Category, value: String },
}

#[derive(Debug)]
pub struct AliasTable {
    aliases: HashMap<String, &'static str>,
}

impl AliasTable {
    /// Generates the literal, `&`->`And`, hyphen-less and hyphen-as-space
    /// variants of each value, each in as-is, lower and upper case.
    #[must_use]
    pub fn build(values: &[&'static str], extras: &[(&'static str, &'static str)]) -> Self {
        let mut aliases = HashMap::with_capacity(values.len() * 12 + extras.len());

        for &value in values {
            let variants = [
                value.to_string(),
                value.replace('&', "And"),
                value.replace('-', ""),
                value.replace('-', " "),
            ];

            for variant in variants {
                aliases.insert(variant.to_lowercase(), value);
                aliases.insert(variant.to_uppercase(), value);
                aliases.insert(variant, value);
            }
        }

        for &(alias, value) in extras {
            aliases.insert(alias.to_string(), value);
        }

        Self { aliases }
    }

    #[must_use]
    pub fn get(&self, raw: &str) -> Option<&'static str> {
        self.aliases.get(raw).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

pub fn resolve(category: Category, raw: &str) -> Result<&'static str, AliasError> {
    category
        .table()
        .get(raw)
        .ok_or_else(|| AliasError::Unknown {
            category,
            value: raw.to_string(),
        })
}

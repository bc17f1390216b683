use super::related::count_distinct_active_names;
use crate::domain::TitleType;
use crate::entities::{prelude::*, title};
use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

/// The columns the aggregation reads from one active title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionRow {
    pub duration: Option<i32>,
    pub rating: Option<String>,
    pub release_year: Option<i32>,
    pub netflix_date_added: Option<NaiveDate>,
}

pub struct SummaryRepository {
    conn: DatabaseConnection,
}

impl SummaryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn active_title_count(&self) -> Result<u64> {
        Ok(Title::find()
            .filter(title::Column::Deleted.is_null())
            .count(&self.conn)
            .await?)
    }

    pub async fn distinct_director_count(&self) -> Result<u64> {
        Ok(count_distinct_active_names::<TitleDirector, _>(&self.conn).await?)
    }

    pub async fn distinct_cast_member_count(&self) -> Result<u64> {
        Ok(count_distinct_active_names::<TitleCastMember, _>(&self.conn).await?)
    }

    pub async fn partition_rows(&self, title_type: TitleType) -> Result<Vec<PartitionRow>> {
        let rows: Vec<(Option<i32>, Option<String>, Option<i32>, Option<NaiveDate>)> = Title::find()
            .select_only()
            .column(title::Column::Duration)
            .column(title::Column::Rating)
            .column(title::Column::ReleaseYear)
            .column(title::Column::NetflixDateAdded)
            .filter(title::Column::Deleted.is_null())
            .filter(title::Column::TitleType.eq(title_type))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(duration, rating, release_year, netflix_date_added)| PartitionRow {
                    duration,
                    rating,
                    release_year,
                    netflix_date_added,
                },
            )
            .collect())
    }
}

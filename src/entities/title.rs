use crate::domain::{DurationUnit, Rating, TitleType};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "titles")]
pub struct Model {
    /// Generated, not auto-incremented. Inserts retry on collision.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub netflix_show_id: String,
    pub title_type: Option<TitleType>,
    pub title: Option<String>,
    pub netflix_date_added: Option<Date>,
    pub release_year: Option<i32>,
    pub rating: Option<Rating>,
    pub duration: Option<i32>,
    pub duration_units: Option<DurationUnit>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created: DateTimeUtc,
    pub modified: DateTimeUtc,
    /// Soft-delete marker. `None` means the title is active.
    pub deleted: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_director::Entity")]
    TitleDirector,
    #[sea_orm(has_many = "super::title_cast_member::Entity")]
    TitleCastMember,
    #[sea_orm(has_many = "super::title_country::Entity")]
    TitleCountry,
    #[sea_orm(has_many = "super::title_genre::Entity")]
    TitleGenre,
}

impl Related<super::director::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_director::Relation::Director.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_director::Relation::Title.def().rev())
    }
}

impl Related<super::cast_member::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_cast_member::Relation::CastMember.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_cast_member::Relation::Title.def().rev())
    }
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_country::Relation::Country.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_country::Relation::Title.def().rev())
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_genre::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_genre::Relation::Title.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

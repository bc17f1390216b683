use sea_orm::entity::prelude::*;
use std::fmt;

/// `name` always holds a canonical country value.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_country::Entity")]
    TitleCountry,
}

impl Related<super::title_country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TitleCountry.def()
    }
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_country::Relation::Title.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_country::Relation::Country.def().rev())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl ActiveModelBehavior for ActiveModel {}

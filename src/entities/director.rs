use sea_orm::entity::prelude::*;
use std::fmt;

/// Names are not unique; ingested data carries duplicate director rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "directors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_director::Entity")]
    TitleDirector,
}

impl Related<super::title_director::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TitleDirector.def()
    }
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_director::Relation::Title.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_director::Relation::Director.def().rev())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl ActiveModelBehavior for ActiveModel {}

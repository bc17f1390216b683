use sea_orm::entity::prelude::*;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cast_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_cast_member::Entity")]
    TitleCastMember,
}

impl Related<super::title_cast_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TitleCastMember.def()
    }
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_cast_member::Relation::Title.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_cast_member::Relation::CastMember.def().rev())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl ActiveModelBehavior for ActiveModel {}

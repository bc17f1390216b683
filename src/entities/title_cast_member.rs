use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "title_cast_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub title_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cast_member_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::title::Entity",
        from = "Column::TitleId",
        to = "super::title::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Title,
    #[sea_orm(
        belongs_to = "super::cast_member::Entity",
        from = "Column::CastMemberId",
        to = "super::cast_member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    CastMember,
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Title.def()
    }
}

impl Related<super::cast_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CastMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

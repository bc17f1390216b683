use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        create(manager, &schema, Title).await?;
        create(manager, &schema, Director).await?;
        create(manager, &schema, CastMember).await?;
        create(manager, &schema, Country).await?;
        create(manager, &schema, Genre).await?;

        create(manager, &schema, TitleDirector).await?;
        create(manager, &schema, TitleCastMember).await?;
        create(manager, &schema, TitleCountry).await?;
        create(manager, &schema, TitleGenre).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TitleGenre).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleCountry).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleCastMember).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleDirector).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Country).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CastMember).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Director).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Title).to_owned())
            .await?;

        Ok(())
    }
}

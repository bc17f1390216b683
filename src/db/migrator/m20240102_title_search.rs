use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Full-text index over title and description, keyed by `titles.id`.
const CREATE_SEARCH: &[&str] = &[
    "CREATE VIRTUAL TABLE IF NOT EXISTS title_search USING fts5(
        title,
        description,
        tokenize = 'porter unicode61'
    )",
    "CREATE TRIGGER IF NOT EXISTS titles_search_insert AFTER INSERT ON titles BEGIN
        INSERT INTO title_search (rowid, title, description)
        VALUES (new.id, COALESCE(new.title, ''), COALESCE(new.description, ''));
    END",
    "CREATE TRIGGER IF NOT EXISTS titles_search_update AFTER UPDATE OF title, description ON titles BEGIN
        DELETE FROM title_search WHERE rowid = old.id;
        INSERT INTO title_search (rowid, title, description)
        VALUES (new.id, COALESCE(new.title, ''), COALESCE(new.description, ''));
    END",
    "CREATE TRIGGER IF NOT EXISTS titles_search_delete AFTER DELETE ON titles BEGIN
        DELETE FROM title_search WHERE rowid = old.id;
    END",
    "INSERT INTO title_search (rowid, title, description)
        SELECT id, COALESCE(title, ''), COALESCE(description, '') FROM titles
        WHERE id NOT IN (SELECT rowid FROM title_search)",
];

const DROP_SEARCH: &[&str] = &[
    "DROP TRIGGER IF EXISTS titles_search_delete",
    "DROP TRIGGER IF EXISTS titles_search_update",
    "DROP TRIGGER IF EXISTS titles_search_insert",
    "DROP TABLE IF EXISTS title_search",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in CREATE_SEARCH {
            db.execute_unprepared(sql).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_titles_deleted")
                    .table(Titles::Table)
                    .col(Titles::Deleted)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_titles_title_type")
                    .table(Titles::Table)
                    .col(Titles::TitleType)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_titles_title_type").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_titles_deleted").to_owned())
            .await?;

        let db = manager.get_connection();
        for sql in DROP_SEARCH {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Titles {
    Table,
    Deleted,
    TitleType,
}

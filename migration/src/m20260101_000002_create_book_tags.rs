use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (book, tag) pair, written once per category appearance
        manager
            .create_table(
                Table::create()
                    .table(BookTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookTags::Asin).string().not_null())
                    .col(ColumnDef::new(BookTags::Tag).string().not_null())
                    .primary_key(Index::create().col(BookTags::Asin).col(BookTags::Tag))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_book_tags_tag")
                    .table(BookTags::Table)
                    .col(BookTags::Tag)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookTags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BookTags {
    Table,
    Asin,
    Tag,
}

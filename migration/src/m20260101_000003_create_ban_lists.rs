use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BannedTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BannedTags::Tag).string().not_null().primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BannedWords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BannedWords::Word).string().not_null().primary_key())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BannedWords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BannedTags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BannedTags {
    Table,
    Tag,
}

#[derive(DeriveIden)]
enum BannedWords {
    Table,
    Word,
}

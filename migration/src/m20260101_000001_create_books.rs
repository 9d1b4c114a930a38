use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create books table
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Books::Asin).string().not_null().primary_key())
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Subtitle).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Author).string().not_null().default(""))
                    .col(ColumnDef::new(Books::AuthorLink).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Series).string().not_null().default(""))
                    .col(ColumnDef::new(Books::SeriesLink).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Format).string().not_null().default(""))
                    .col(ColumnDef::new(Books::ReleaseDate).date())
                    .col(ColumnDef::new(Books::Image).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Sample).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Link).string().not_null())
                    .col(ColumnDef::new(Books::Summary).text().not_null().default(""))
                    .col(ColumnDef::new(Books::Copyright).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Tags).json().not_null())
                    .col(ColumnDef::new(Books::Rating).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Books::RatingPerformance)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Books::RatingStory).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Books::DurationInMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Books::Popularity).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Books::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_popularity")
                    .table(Books::Table)
                    .col(Books::Popularity)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Asin,
    Title,
    Subtitle,
    Author,
    AuthorLink,
    Series,
    SeriesLink,
    Format,
    ReleaseDate,
    Image,
    Sample,
    Link,
    Summary,
    Copyright,
    Tags,
    Rating,
    RatingPerformance,
    RatingStory,
    DurationInMinutes,
    Popularity,
    CreatedAt,
}

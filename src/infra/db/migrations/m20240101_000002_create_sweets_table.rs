//! Migration: Create sweets table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sweets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sweets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sweets::Name).string().not_null())
                    .col(ColumnDef::new(Sweets::Category).string().not_null())
                    .col(
                        ColumnDef::new(Sweets::Price)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(Sweets::Price).gte(0)),
                    )
                    // Backstop for the stock invariant; purchase already guards on quantity > 0
                    .col(
                        ColumnDef::new(Sweets::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Sweets::Quantity).gte(0)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sweets_category")
                    .table(Sweets::Table)
                    .col(Sweets::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sweets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sweets {
    Table,
    Id,
    Name,
    Category,
    Price,
    Quantity,
}

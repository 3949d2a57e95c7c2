use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250101_000001_create_table::{Cities, Investors};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockItems::Table)
                    .if_not_exists()
                    .col(pk_auto(StockItems::Id))
                    .col(string_len(StockItems::ProductName, 200))
                    .col(string_null(StockItems::Reference))
                    .col(decimal(StockItems::BuyPrice).decimal_len(16, 4))
                    .col(decimal(StockItems::ExpectedSellPrice).decimal_len(16, 4))
                    .col(integer(StockItems::Quantity).default(1))
                    .col(integer(StockItems::CityId))
                    .col(integer_null(StockItems::InvestorId))
                    .col(string_null(StockItems::Photo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_items_city")
                            .from(StockItems::Table, StockItems::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_items_investor")
                            .from(StockItems::Table, StockItems::InvestorId)
                            .to(Investors::Table, Investors::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockItems::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum StockItems {
    Table,
    Id,
    ProductName,
    Reference,
    BuyPrice,
    ExpectedSellPrice,
    Quantity,
    CityId,
    InvestorId,
    Photo,
}

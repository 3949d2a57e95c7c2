use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250101_000001_create_table::ExpenseTypes;
use crate::m20250201_000001_add_stock_items::StockItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockExpenses::Table)
                    .if_not_exists()
                    .col(pk_auto(StockExpenses::Id))
                    .col(integer(StockExpenses::StockItemId))
                    .col(integer(StockExpenses::ExpenseTypeId))
                    .col(decimal(StockExpenses::Amount).decimal_len(16, 4))
                    .col(string_null(StockExpenses::Comment))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_expenses_stock_item")
                            .from(StockExpenses::Table, StockExpenses::StockItemId)
                            .to(StockItems::Table, StockItems::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_expenses_expense_type")
                            .from(StockExpenses::Table, StockExpenses::ExpenseTypeId)
                            .to(ExpenseTypes::Table, ExpenseTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockExpenses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StockExpenses {
    Table,
    Id,
    StockItemId,
    ExpenseTypeId,
    Amount,
    Comment,
}

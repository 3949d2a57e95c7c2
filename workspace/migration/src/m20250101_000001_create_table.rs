use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookup tables
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(pk_auto(Cities::Id))
                    .col(string_len(Cities::Name, 100).unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string_len(Employees::Name, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Investors::Table)
                    .if_not_exists()
                    .col(pk_auto(Investors::Id))
                    .col(string_len(Investors::Name, 100))
                    .col(string_null(Investors::Comment))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(ExpenseTypes::Id))
                    .col(string_len(ExpenseTypes::Name, 100).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create sales table
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(pk_auto(Sales::Id))
                    .col(string_len(Sales::ProductName, 200))
                    .col(string_null(Sales::Reference))
                    .col(decimal(Sales::BuyPrice).decimal_len(16, 4))
                    .col(decimal(Sales::SellPrice).decimal_len(16, 4))
                    .col(integer(Sales::CityId))
                    .col(integer(Sales::EmployeeId))
                    .col(integer_null(Sales::InvestorId))
                    .col(date(Sales::Date))
                    .col(string_null(Sales::Photo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_city")
                            .from(Sales::Table, Sales::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_employee")
                            .from(Sales::Table, Sales::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_investor")
                            .from(Sales::Table, Sales::InvestorId)
                            .to(Investors::Table, Investors::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_date")
                    .table(Sales::Table)
                    .col(Sales::Date)
                    .to_owned(),
            )
            .await?;

        // Create expenses table (costs attached to a sale)
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::SaleId))
                    .col(integer(Expenses::ExpenseTypeId))
                    .col(decimal(Expenses::Amount).decimal_len(16, 4))
                    .col(string_null(Expenses::Comment))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_sale")
                            .from(Expenses::Table, Expenses::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_expense_type")
                            .from(Expenses::Table, Expenses::ExpenseTypeId)
                            .to(ExpenseTypes::Table, ExpenseTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create general_expenses table
        manager
            .create_table(
                Table::create()
                    .table(GeneralExpenses::Table)
                    .if_not_exists()
                    .col(pk_auto(GeneralExpenses::Id))
                    .col(integer(GeneralExpenses::ExpenseTypeId))
                    .col(decimal(GeneralExpenses::Amount).decimal_len(16, 4))
                    .col(date(GeneralExpenses::Date))
                    .col(integer_null(GeneralExpenses::CityId))
                    .col(string_null(GeneralExpenses::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_general_expenses_expense_type")
                            .from(GeneralExpenses::Table, GeneralExpenses::ExpenseTypeId)
                            .to(ExpenseTypes::Table, ExpenseTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_general_expenses_city")
                            .from(GeneralExpenses::Table, GeneralExpenses::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(GeneralExpenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ExpenseTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Investors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Cities {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Investors {
    Table,
    Id,
    Name,
    Comment,
}

#[derive(DeriveIden)]
pub(crate) enum ExpenseTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    ProductName,
    Reference,
    BuyPrice,
    SellPrice,
    CityId,
    EmployeeId,
    InvestorId,
    Date,
    Photo,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    SaleId,
    ExpenseTypeId,
    Amount,
    Comment,
}

#[derive(DeriveIden)]
enum GeneralExpenses {
    Table,
    Id,
    ExpenseTypeId,
    Amount,
    Date,
    CityId,
    Description,
}

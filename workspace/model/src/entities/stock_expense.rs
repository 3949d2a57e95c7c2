use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{expense_type, stock_item};

/// A cost attached to a stock item (transport, storage, repair before resale).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_item_id: i32,
    pub expense_type_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "stock_item::Entity",
        from = "Column::StockItemId",
        to = "stock_item::Column::Id",
        on_delete = "Cascade"
    )]
    StockItem,
    #[sea_orm(
        belongs_to = "expense_type::Entity",
        from = "Column::ExpenseTypeId",
        to = "expense_type::Column::Id",
        on_delete = "Restrict"
    )]
    ExpenseType,
}

impl Related<stock_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockItem.def()
    }
}

impl Related<expense_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sum of the amounts of the given stock expense rows.
pub fn total(expenses: &[Model]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

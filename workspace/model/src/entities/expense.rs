use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{expense_type, sale};

/// A cost attached to one sale (delivery, repair, commission...).
/// Rows are removed together with their sale.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sale_id: i32,
    pub expense_type_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "sale::Entity",
        from = "Column::SaleId",
        to = "sale::Column::Id",
        on_delete = "Cascade"
    )]
    Sale,
    #[sea_orm(
        belongs_to = "expense_type::Entity",
        from = "Column::ExpenseTypeId",
        to = "expense_type::Column::Id",
        on_delete = "Restrict"
    )]
    ExpenseType,
}

impl Related<sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<expense_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sum of the amounts of the given expense rows.
pub fn total(expenses: &[Model]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

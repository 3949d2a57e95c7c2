use sea_orm::entity::prelude::*;

/// Lookup for expense categories ("Delivery", "Repair", "Rent", ...).
/// Shared by sale expenses, stock expenses and general expenses.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense::Entity")]
    Expense,
    #[sea_orm(has_many = "super::stock_expense::Entity")]
    StockExpense,
    #[sea_orm(has_many = "super::general_expense::Entity")]
    GeneralExpense,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::stock_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockExpense.def()
    }
}

impl Related<super::general_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{city, expense_type};

/// An operating cost not tied to a sale: rent, salaries, advertising.
/// A missing city means the expense is shared by the whole business.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "general_expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub expense_type_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub city_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "expense_type::Entity",
        from = "Column::ExpenseTypeId",
        to = "expense_type::Column::Id",
        on_delete = "Restrict"
    )]
    ExpenseType,
    #[sea_orm(
        belongs_to = "city::Entity",
        from = "Column::CityId",
        to = "city::Column::Id",
        on_delete = "SetNull"
    )]
    City,
}

impl Related<expense_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseType.def()
    }
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

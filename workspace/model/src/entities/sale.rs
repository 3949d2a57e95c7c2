use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{city, employee, expense, investor};

/// A closed sale of a single product.
/// The profit of a sale depends on its expenses, see [`Model::profit`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_name: String,
    /// Free-form article or serial reference.
    pub reference: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub buy_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub sell_price: Decimal,
    pub city_id: i32,
    pub employee_id: i32,
    /// Investor whose stock was sold, if any.
    pub investor_id: Option<i32>,
    pub date: NaiveDate,
    /// File name of the product photo.
    pub photo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "city::Entity",
        from = "Column::CityId",
        to = "city::Column::Id",
        on_delete = "Restrict"
    )]
    City,
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::EmployeeId",
        to = "employee::Column::Id",
        on_delete = "Restrict"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "investor::Entity",
        from = "Column::InvestorId",
        to = "investor::Column::Id",
        on_delete = "SetNull"
    )]
    Investor,
    #[sea_orm(has_many = "expense::Entity")]
    Expense,
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<investor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investor.def()
    }
}

impl Related<expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Sell price minus buy price, before any expenses.
    pub fn gross_profit(&self) -> Decimal {
        self.sell_price - self.buy_price
    }

    /// Net profit of the sale given its expense rows.
    pub fn profit(&self, expenses: &[expense::Model]) -> Decimal {
        self.gross_profit() - expense::total(expenses)
    }
}

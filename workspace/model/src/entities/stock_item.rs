use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{city, investor, stock_expense};

/// A batch of identical products bought for resale and not yet (or already) sold.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_name: String,
    pub reference: Option<String>,
    /// Purchase price of one unit.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub buy_price: Decimal,
    /// Planned sell price of one unit.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub expected_sell_price: Decimal,
    pub quantity: i32,
    pub city_id: i32,
    /// Investor who funded the purchase, if any.
    pub investor_id: Option<i32>,
    pub photo: Option<String>,
    #[sea_orm(default_value = "false")]
    pub sold: bool,
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
        belongs_to = "investor::Entity",
        from = "Column::InvestorId",
        to = "investor::Column::Id",
        on_delete = "SetNull"
    )]
    Investor,
    #[sea_orm(has_many = "stock_expense::Entity")]
    StockExpense,
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<investor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investor.def()
    }
}

impl Related<stock_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Money tied up in this batch: `buy_price * quantity`.
    pub fn total_invested(&self) -> Decimal {
        self.buy_price * Decimal::from(self.quantity)
    }

    /// `(expected_sell_price - buy_price) * quantity`.
    pub fn expected_profit(&self) -> Decimal {
        (self.expected_sell_price - self.buy_price) * Decimal::from(self.quantity)
    }
}

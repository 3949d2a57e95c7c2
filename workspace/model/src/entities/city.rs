use sea_orm::entity::prelude::*;

/// A city the business trades in.
/// Sales and stock always belong to a city, general expenses optionally.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale::Entity")]
    Sale,
    #[sea_orm(has_many = "super::stock_item::Entity")]
    StockItem,
    #[sea_orm(has_many = "super::general_expense::Entity")]
    GeneralExpense,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::stock_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockItem.def()
    }
}

impl Related<super::general_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

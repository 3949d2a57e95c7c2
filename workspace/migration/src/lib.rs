pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_table;
mod m20250201_000001_add_stock_items;
mod m20250215_000001_add_stock_sold_flag;
mod m20250301_000001_add_stock_expenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_table::Migration),
            Box::new(m20250201_000001_add_stock_items::Migration),
            Box::new(m20250215_000001_add_stock_sold_flag::Migration),
            Box::new(m20250301_000001_add_stock_expenses::Migration),
        ]
    }
}

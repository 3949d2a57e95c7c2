//! SeaORM entity modules for the bookkeeping application.
//! Lookup tables (cities, employees, investors, expense types) are referenced
//! by the business records (sales, stock items, general expenses), which in
//! turn own their expense rows.

pub mod city;
pub mod employee;
pub mod expense;
pub mod expense_type;
pub mod general_expense;
pub mod investor;
pub mod sale;
pub mod stock_expense;
pub mod stock_item;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::city::Entity as City;
    pub use super::employee::Entity as Employee;
    pub use super::expense::Entity as Expense;
    pub use super::expense_type::Entity as ExpenseType;
    pub use super::general_expense::Entity as GeneralExpense;
    pub use super::investor::Entity as Investor;
    pub use super::sale::Entity as Sale;
    pub use super::stock_expense::Entity as StockExpense;
    pub use super::stock_item::Entity as StockItem;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn seed_lookups(
        db: &DatabaseConnection,
    ) -> Result<(city::Model, employee::Model, expense_type::Model), DbErr> {
        let city = city::ActiveModel {
            name: Set("Chita".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let employee = employee::ActiveModel {
            name: Set("Anna".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let delivery = expense_type::ActiveModel {
            name: Set("Delivery".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok((city, employee, delivery))
    }

    #[tokio::test]
    async fn test_sale_with_expenses() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (city, employee, delivery) = seed_lookups(&db).await?;

        let sale = sale::ActiveModel {
            product_name: Set("Camera".to_string()),
            reference: Set(Some("CAM-1".to_string())),
            buy_price: Set(Decimal::new(10000, 2)),
            sell_price: Set(Decimal::new(25000, 2)),
            city_id: Set(city.id),
            employee_id: Set(employee.id),
            investor_id: Set(None),
            date: Set(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()),
            photo: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for amount in [1500, 500] {
            expense::ActiveModel {
                sale_id: Set(sale.id),
                expense_type_id: Set(delivery.id),
                amount: Set(Decimal::new(amount, 2)),
                comment: Set(None),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let loaded = Sale::find_by_id(sale.id)
            .find_with_related(Expense)
            .all(&db)
            .await?;
        assert_eq!(loaded.len(), 1);
        let (loaded_sale, expenses) = &loaded[0];
        assert_eq!(expenses.len(), 2);
        assert_eq!(loaded_sale.gross_profit(), Decimal::new(15000, 2));
        assert_eq!(loaded_sale.profit(expenses), Decimal::new(13000, 2));

        let sale_city = sale.find_related(City).one(&db).await?;
        assert_eq!(sale_city.map(|c| c.name), Some("Chita".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_sale_removes_expenses() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (city, employee, delivery) = seed_lookups(&db).await?;

        let sale = sale::ActiveModel {
            product_name: Set("Phone".to_string()),
            reference: Set(None),
            buy_price: Set(Decimal::new(5000, 2)),
            sell_price: Set(Decimal::new(9000, 2)),
            city_id: Set(city.id),
            employee_id: Set(employee.id),
            investor_id: Set(None),
            date: Set(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
            photo: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        expense::ActiveModel {
            sale_id: Set(sale.id),
            expense_type_id: Set(delivery.id),
            amount: Set(Decimal::new(700, 2)),
            comment: Set(Some("courier".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        Sale::delete_by_id(sale.id).exec(&db).await?;

        let remaining = Expense::find()
            .filter(expense::Column::SaleId.eq(sale.id))
            .count(&db)
            .await?;
        assert_eq!(remaining, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_referenced_city_cannot_be_deleted() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (city, _, _) = seed_lookups(&db).await?;

        stock_item::ActiveModel {
            product_name: Set("Lens".to_string()),
            reference: Set(None),
            buy_price: Set(Decimal::new(3000, 2)),
            expected_sell_price: Set(Decimal::new(4500, 2)),
            quantity: Set(4),
            city_id: Set(city.id),
            investor_id: Set(None),
            photo: Set(None),
            sold: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = City::delete_by_id(city.id).exec(&db).await;
        assert!(result.is_err());
        assert_eq!(City::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_investor_detaches_stock() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (city, _, _) = seed_lookups(&db).await?;

        let investor = investor::ActiveModel {
            name: Set("Boris".to_string()),
            comment: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let item = stock_item::ActiveModel {
            product_name: Set("Drone".to_string()),
            reference: Set(None),
            buy_price: Set(Decimal::new(40000, 2)),
            expected_sell_price: Set(Decimal::new(55000, 2)),
            quantity: Set(2),
            city_id: Set(city.id),
            investor_id: Set(Some(investor.id)),
            photo: Set(None),
            sold: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert_eq!(item.total_invested(), Decimal::new(80000, 2));
        assert_eq!(item.expected_profit(), Decimal::new(30000, 2));

        Investor::delete_by_id(investor.id).exec(&db).await?;

        let reloaded = StockItem::find_by_id(item.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.investor_id, None);

        Ok(())
    }
}

use anyhow::{bail, Result};
use model::entities::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, TransactionTrait};
use tracing::{info, trace, warn};

use super::initdb::connect;

/// Deletes every row, children before parents, in one transaction.
/// Returns the number of deleted rows per table.
pub async fn clear_all<C>(db: &C) -> Result<Vec<(&'static str, u64)>, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut deleted = Vec::new();

    deleted.push(("expenses", Expense::delete_many().exec(&txn).await?.rows_affected));
    deleted.push((
        "stock_expenses",
        StockExpense::delete_many().exec(&txn).await?.rows_affected,
    ));
    deleted.push((
        "general_expenses",
        GeneralExpense::delete_many().exec(&txn).await?.rows_affected,
    ));
    deleted.push(("sales", Sale::delete_many().exec(&txn).await?.rows_affected));
    deleted.push((
        "stock_items",
        StockItem::delete_many().exec(&txn).await?.rows_affected,
    ));
    deleted.push(("investors", Investor::delete_many().exec(&txn).await?.rows_affected));
    deleted.push(("employees", Employee::delete_many().exec(&txn).await?.rows_affected));
    deleted.push((
        "expense_types",
        ExpenseType::delete_many().exec(&txn).await?.rows_affected,
    ));
    deleted.push(("cities", City::delete_many().exec(&txn).await?.rows_affected));

    txn.commit().await?;
    Ok(deleted)
}

pub async fn clear_database(database_url: &str, confirmed: bool) -> Result<()> {
    trace!("Entering clear_database function");
    if !confirmed {
        warn!("Refusing to clear the database without --yes");
        bail!("clearing the database deletes every record; pass --yes to confirm");
    }

    let db = connect(database_url).await?;
    for (table, rows) in clear_all(&db).await? {
        info!("Deleted {} rows from {}", rows, table);
    }

    info!("All tables cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{seed_lookups, setup_test_db};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_clear_all_empties_every_table() {
        let db = setup_test_db().await;
        seed_lookups(&db).await;

        let deleted = clear_all(&db).await.unwrap();

        let cities = deleted.iter().find(|(t, _)| *t == "cities").unwrap();
        assert_eq!(cities.1, 2);
        assert_eq!(City::find().count(&db).await.unwrap(), 0);
        assert_eq!(Employee::find().count(&db).await.unwrap(), 0);
        assert_eq!(ExpenseType::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_database_requires_confirmation() {
        assert!(clear_database("sqlite::memory:", false).await.is_err());
    }
}

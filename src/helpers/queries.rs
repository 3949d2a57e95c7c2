//! Row loading for the listings and reports. Filters run in SQL, the
//! aggregation afterwards in `compute`.

use chrono::NaiveDate;
use compute::{SaleRecord, StockRecord};
use model::entities::{expense, general_expense, sale, stock_expense, stock_item};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, instrument};

use super::lookups::CityFilter;

/// Half-open date interval, `None` for all time.
pub type Interval = Option<(NaiveDate, NaiveDate)>;

#[instrument(skip(db))]
pub async fn load_sales(
    db: &DatabaseConnection,
    interval: Interval,
    city: &CityFilter,
) -> Result<Vec<SaleRecord>, DbErr> {
    let mut query = sale::Entity::find();

    match city {
        CityFilter::All => {}
        CityFilter::Only { id, .. } => query = query.filter(sale::Column::CityId.eq(*id)),
        CityFilter::Unknown(_) => return Ok(Vec::new()),
    }

    if let Some((start, end)) = interval {
        query = query
            .filter(sale::Column::Date.gte(start))
            .filter(sale::Column::Date.lt(end));
    }

    let rows = query
        .order_by_asc(sale::Column::Id)
        .find_with_related(expense::Entity)
        .all(db)
        .await?;

    debug!("Loaded {} sales", rows.len());
    Ok(rows.into_iter().map(SaleRecord::from).collect())
}

/// General expenses in the interval. A city filter keeps only the expenses
/// booked on that city.
#[instrument(skip(db))]
pub async fn load_general_expenses(
    db: &DatabaseConnection,
    interval: Interval,
    city: &CityFilter,
) -> Result<Vec<general_expense::Model>, DbErr> {
    let mut query = general_expense::Entity::find();

    match city {
        CityFilter::All => {}
        CityFilter::Only { id, .. } => {
            query = query.filter(general_expense::Column::CityId.eq(*id))
        }
        CityFilter::Unknown(_) => return Ok(Vec::new()),
    }

    if let Some((start, end)) = interval {
        query = query
            .filter(general_expense::Column::Date.gte(start))
            .filter(general_expense::Column::Date.lt(end));
    }

    let rows = query
        .order_by_asc(general_expense::Column::Date)
        .order_by_asc(general_expense::Column::Id)
        .all(db)
        .await?;

    debug!("Loaded {} general expenses", rows.len());
    Ok(rows)
}

#[derive(Debug, Default, Clone)]
pub struct StockFilter {
    pub city: Option<i32>,
    pub investor_id: Option<i32>,
    pub sold: Option<bool>,
}

#[instrument(skip(db))]
pub async fn load_stock(
    db: &DatabaseConnection,
    filter: &StockFilter,
) -> Result<Vec<StockRecord>, DbErr> {
    let mut query = stock_item::Entity::find();

    if let Some(city_id) = filter.city {
        query = query.filter(stock_item::Column::CityId.eq(city_id));
    }
    if let Some(investor_id) = filter.investor_id {
        query = query.filter(stock_item::Column::InvestorId.eq(investor_id));
    }
    if let Some(sold) = filter.sold {
        query = query.filter(stock_item::Column::Sold.eq(sold));
    }

    let rows = query
        .order_by_asc(stock_item::Column::Id)
        .find_with_related(stock_expense::Entity)
        .all(db)
        .await?;

    debug!("Loaded {} stock items", rows.len());
    Ok(rows.into_iter().map(StockRecord::from).collect())
}

/// Dates of every sale, for the year selectors.
pub async fn sale_dates(db: &DatabaseConnection) -> Result<Vec<NaiveDate>, DbErr> {
    sale::Entity::find()
        .select_only()
        .column(sale::Column::Date)
        .into_tuple::<NaiveDate>()
        .all(db)
        .await
}

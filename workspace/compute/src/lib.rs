//! Report computations over rows already loaded from the database.
//!
//! Nothing here touches a connection: handlers fetch the rows for the
//! requested filter and pass them in.

use std::collections::HashMap;

use rust_decimal::Decimal;

pub mod dashboard;
pub mod error;
pub mod expenses;
pub mod investors;
pub mod period;
pub mod sales;
pub mod stock;
pub mod summary;
pub mod years;

pub use error::{ComputeError, Result};
pub use period::{PeriodSelection, YearFilter};
pub use sales::{SaleRecord, SaleSort};
pub use stock::StockRecord;

/// Report amounts are shown with two decimal places.
pub fn money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

pub(crate) fn city_name(names: &HashMap<i32, String>, city_id: i32) -> &str {
    names.get(&city_id).map(String::as_str).unwrap_or_default()
}

pub mod lookups;
pub mod queries;
pub mod validation;

use chrono::{Local, NaiveDate};

/// Local calendar date, the default for new records and the current month.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

//! Sale listing: ordering, profit totals and the month figures shown with it.

use std::cmp::Ordering;
use std::collections::HashMap;

use common::{ReportPeriod, SalesListMetrics};
use model::entities::{expense, general_expense, sale};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::money;

/// A sale together with its expense rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub sale: sale::Model,
    pub expenses: Vec<expense::Model>,
}

impl From<(sale::Model, Vec<expense::Model>)> for SaleRecord {
    fn from((sale, expenses): (sale::Model, Vec<expense::Model>)) -> Self {
        Self { sale, expenses }
    }
}

impl SaleRecord {
    pub fn total_expenses(&self) -> Decimal {
        expense::total(&self.expenses)
    }

    pub fn gross_profit(&self) -> Decimal {
        self.sale.gross_profit()
    }

    pub fn profit(&self) -> Decimal {
        self.sale.profit(&self.expenses)
    }
}

/// Orderings offered by the sale listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaleSort {
    DateAsc,
    #[default]
    DateDesc,
    SellDesc,
    SellAsc,
    City,
    ProfitDesc,
    ProfitAsc,
}

impl SaleSort {
    /// Unknown keys sort by date, newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("date_asc") => SaleSort::DateAsc,
            Some("date_desc") => SaleSort::DateDesc,
            Some("sell_desc") => SaleSort::SellDesc,
            Some("sell_asc") => SaleSort::SellAsc,
            Some("city") => SaleSort::City,
            Some("profit_desc") => SaleSort::ProfitDesc,
            Some("profit_asc") => SaleSort::ProfitAsc,
            _ => SaleSort::DateDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleSort::DateAsc => "date_asc",
            SaleSort::DateDesc => "date_desc",
            SaleSort::SellDesc => "sell_desc",
            SaleSort::SellAsc => "sell_asc",
            SaleSort::City => "city",
            SaleSort::ProfitDesc => "profit_desc",
            SaleSort::ProfitAsc => "profit_asc",
        }
    }
}

/// Sorts in place. The sort is stable, so records that compare equal keep
/// the order they were passed in (id order when loaded from the database).
pub fn sort_sales(records: &mut [SaleRecord], sort: SaleSort, city_names: &HashMap<i32, String>) {
    records.sort_by(|a, b| -> Ordering {
        match sort {
            SaleSort::DateAsc => a.sale.date.cmp(&b.sale.date),
            SaleSort::DateDesc => b.sale.date.cmp(&a.sale.date),
            SaleSort::SellDesc => b.sale.sell_price.cmp(&a.sale.sell_price),
            SaleSort::SellAsc => a.sale.sell_price.cmp(&b.sale.sell_price),
            SaleSort::City => crate::city_name(city_names, a.sale.city_id)
                .cmp(crate::city_name(city_names, b.sale.city_id)),
            SaleSort::ProfitDesc => b.profit().cmp(&a.profit()),
            SaleSort::ProfitAsc => a.profit().cmp(&b.profit()),
        }
    });
}

/// Sum of the net profits of the listed sales.
pub fn total_profit(records: &[SaleRecord]) -> Decimal {
    money(records.iter().map(SaleRecord::profit).sum())
}

/// Month figures for the listing.
///
/// `records` and `general` are expected to be already filtered by city;
/// only rows dated inside `period` are counted.
#[instrument(skip(records, general), fields(num_sales = records.len(), num_general = general.len(), period = %period.label))]
pub fn month_metrics(
    records: &[SaleRecord],
    general: &[general_expense::Model],
    period: &ReportPeriod,
) -> SalesListMetrics {
    let in_period: Vec<&SaleRecord> = records
        .iter()
        .filter(|r| period.contains(r.sale.date))
        .collect();

    let gross_income: Decimal = in_period.iter().map(|r| r.sale.sell_price).sum();
    let total_buy: Decimal = in_period.iter().map(|r| r.sale.buy_price).sum();
    let sale_expenses: Decimal = in_period.iter().map(|r| r.total_expenses()).sum();
    let general_expenses: Decimal = general
        .iter()
        .filter(|g| period.contains(g.date))
        .map(|g| g.amount)
        .sum();
    let total_expenses = sale_expenses + general_expenses;

    debug!(
        "{} sales in {}, sale expenses {}, general expenses {}",
        in_period.len(),
        period.label,
        sale_expenses,
        general_expenses
    );

    SalesListMetrics {
        period_label: period.label.clone(),
        count_sales: in_period.len(),
        gross_income: money(gross_income),
        total_expenses: money(total_expenses),
        net_profit_month: money(gross_income - total_buy - total_expenses),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::NaiveDate;
    use model::entities::{expense, general_expense, sale};
    use rust_decimal::Decimal;

    use super::SaleRecord;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    pub fn record(
        id: i32,
        city_id: i32,
        day: NaiveDate,
        buy: i64,
        sell: i64,
        expenses: &[(i32, i64)],
    ) -> SaleRecord {
        SaleRecord {
            sale: sale::Model {
                id,
                product_name: format!("Product {}", id),
                reference: None,
                buy_price: dec(buy),
                sell_price: dec(sell),
                city_id,
                employee_id: 1,
                investor_id: None,
                date: day,
                photo: None,
            },
            expenses: expenses
                .iter()
                .enumerate()
                .map(|(i, (type_id, amount))| expense::Model {
                    id: id * 100 + i as i32,
                    sale_id: id,
                    expense_type_id: *type_id,
                    amount: dec(*amount),
                    comment: None,
                })
                .collect(),
        }
    }

    pub fn general(
        id: i32,
        type_id: i32,
        day: NaiveDate,
        amount: i64,
        city_id: Option<i32>,
    ) -> general_expense::Model {
        general_expense::Model {
            id,
            expense_type_id: type_id,
            amount: dec(amount),
            date: day,
            city_id,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::period::month_period;

    fn ids(records: &[SaleRecord]) -> Vec<i32> {
        records.iter().map(|r| r.sale.id).collect()
    }

    fn cities() -> HashMap<i32, String> {
        HashMap::from([(1, "Omsk".to_string()), (2, "Chita".to_string())])
    }

    fn sample() -> Vec<SaleRecord> {
        vec![
            record(1, 1, date(2026, 10, 2), 100, 150, &[(1, 10)]),
            record(2, 2, date(2026, 10, 5), 50, 300, &[]),
            record(3, 1, date(2026, 9, 20), 80, 90, &[(1, 30)]),
            record(4, 2, date(2026, 10, 5), 10, 150, &[(2, 5)]),
        ]
    }

    #[test]
    fn test_sort_parse_falls_back_to_date_desc() {
        assert_eq!(SaleSort::parse(None), SaleSort::DateDesc);
        assert_eq!(SaleSort::parse(Some("bogus")), SaleSort::DateDesc);
        assert_eq!(SaleSort::parse(Some("profit_asc")), SaleSort::ProfitAsc);
        assert_eq!(SaleSort::City.as_str(), "city");
    }

    #[test]
    fn test_sort_by_date() {
        let mut records = sample();
        sort_sales(&mut records, SaleSort::DateDesc, &cities());
        assert_eq!(ids(&records), vec![2, 4, 1, 3]);

        sort_sales(&mut records, SaleSort::DateAsc, &cities());
        assert_eq!(ids(&records), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_sort_by_sell_price_keeps_ties_in_order() {
        let mut records = sample();
        sort_sales(&mut records, SaleSort::SellDesc, &cities());
        assert_eq!(ids(&records), vec![2, 1, 4, 3]);

        let mut records = sample();
        sort_sales(&mut records, SaleSort::SellAsc, &cities());
        assert_eq!(ids(&records), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_sort_by_city_name() {
        let mut records = sample();
        sort_sales(&mut records, SaleSort::City, &cities());
        assert_eq!(ids(&records), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_by_profit() {
        // profits: 1 -> 40, 2 -> 250, 3 -> -20, 4 -> 135
        let mut records = sample();
        sort_sales(&mut records, SaleSort::ProfitDesc, &cities());
        assert_eq!(ids(&records), vec![2, 4, 1, 3]);

        sort_sales(&mut records, SaleSort::ProfitAsc, &cities());
        assert_eq!(ids(&records), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_total_profit() {
        assert_eq!(total_profit(&sample()), dec(405));
        assert_eq!(total_profit(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_month_metrics() {
        let period = month_period(date(2026, 10, 1)).unwrap();
        let general = vec![
            general(1, 3, date(2026, 10, 10), 20, None),
            general(2, 3, date(2026, 9, 10), 999, None),
        ];

        let metrics = month_metrics(&sample(), &general, &period);

        assert_eq!(metrics.period_label, "October 2026");
        assert_eq!(metrics.count_sales, 3);
        assert_eq!(metrics.gross_income, dec(600));
        // 10 + 5 from sales, 20 general
        assert_eq!(metrics.total_expenses, dec(35));
        assert_eq!(metrics.net_profit_month, dec(600 - 160 - 35));
    }

    #[test]
    fn test_month_metrics_empty_month() {
        let period = month_period(date(2026, 1, 1)).unwrap();
        let metrics = month_metrics(&sample(), &[], &period);

        assert_eq!(metrics.count_sales, 0);
        assert_eq!(metrics.gross_income, Decimal::ZERO);
        assert_eq!(metrics.net_profit_month, Decimal::ZERO);
    }
}

use std::collections::{BTreeMap, HashMap};

use common::{StockCitySummary, StockReport};
use model::entities::{stock_expense, stock_item};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::{city_name, money};

/// A stock item together with its expense rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub item: stock_item::Model,
    pub expenses: Vec<stock_expense::Model>,
}

impl From<(stock_item::Model, Vec<stock_expense::Model>)> for StockRecord {
    fn from((item, expenses): (stock_item::Model, Vec<stock_expense::Model>)) -> Self {
        Self { item, expenses }
    }
}

impl StockRecord {
    pub fn total_expenses(&self) -> Decimal {
        stock_expense::total(&self.expenses)
    }
}

#[derive(Default)]
struct Accumulator {
    items: usize,
    quantity: i64,
    total_invested: Decimal,
    expected_profit: Decimal,
    total_expenses: Decimal,
}

/// Stock grouped by city name. Sold items only count when `include_sold` is set.
#[instrument(skip(records, city_names), fields(num_items = records.len()))]
pub fn summarize_stock(
    records: &[StockRecord],
    city_names: &HashMap<i32, String>,
    include_sold: bool,
) -> StockReport {
    let mut by_city: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for record in records.iter().filter(|r| include_sold || !r.item.sold) {
        let acc = by_city
            .entry(city_name(city_names, record.item.city_id))
            .or_default();
        acc.items += 1;
        acc.quantity += i64::from(record.item.quantity);
        acc.total_invested += record.item.total_invested();
        acc.expected_profit += record.item.expected_profit();
        acc.total_expenses += record.total_expenses();
    }

    let cities: Vec<StockCitySummary> = by_city
        .into_iter()
        .map(|(city, acc)| StockCitySummary {
            city: city.to_string(),
            items: acc.items,
            quantity: acc.quantity,
            total_invested: money(acc.total_invested),
            expected_profit: money(acc.expected_profit),
            total_expenses: money(acc.total_expenses),
        })
        .collect();

    let total_items = cities.iter().map(|c| c.items).sum();
    let total_quantity = cities.iter().map(|c| c.quantity).sum();
    let total_invested: Decimal = cities.iter().map(|c| c.total_invested).sum();
    let expected_profit: Decimal = cities.iter().map(|c| c.expected_profit).sum();

    debug!(
        "Stock summary over {} cities: {} items, {} invested",
        cities.len(),
        total_items,
        total_invested
    );

    StockReport {
        include_sold,
        cities,
        total_items,
        total_quantity,
        total_invested,
        expected_profit,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use model::entities::{stock_expense, stock_item};
    use rust_decimal::Decimal;

    use super::StockRecord;

    #[allow(clippy::too_many_arguments)]
    pub fn stock(
        id: i32,
        city_id: i32,
        investor_id: Option<i32>,
        buy: i64,
        expected: i64,
        quantity: i32,
        sold: bool,
        expenses: &[i64],
    ) -> StockRecord {
        StockRecord {
            item: stock_item::Model {
                id,
                product_name: format!("Item {}", id),
                reference: None,
                buy_price: Decimal::from(buy),
                expected_sell_price: Decimal::from(expected),
                quantity,
                city_id,
                investor_id,
                photo: None,
                sold,
            },
            expenses: expenses
                .iter()
                .enumerate()
                .map(|(i, amount)| stock_expense::Model {
                    id: id * 100 + i as i32,
                    stock_item_id: id,
                    expense_type_id: 1,
                    amount: Decimal::from(*amount),
                    comment: None,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::stock;
    use super::*;

    fn names() -> HashMap<i32, String> {
        HashMap::from([(1, "Omsk".to_string()), (2, "Chita".to_string())])
    }

    fn sample() -> Vec<StockRecord> {
        vec![
            stock(1, 1, None, 10, 15, 4, false, &[3]),
            stock(2, 2, Some(1), 100, 130, 1, false, &[]),
            stock(3, 1, None, 20, 30, 2, true, &[7, 1]),
        ]
    }

    #[test]
    fn test_sold_items_are_excluded_by_default() {
        let report = summarize_stock(&sample(), &names(), false);

        assert!(!report.include_sold);
        assert_eq!(report.cities.len(), 2);
        assert_eq!(report.cities[0].city, "Chita");
        assert_eq!(report.cities[1].city, "Omsk");
        assert_eq!(report.cities[1].items, 1);
        assert_eq!(report.cities[1].quantity, 4);
        assert_eq!(report.cities[1].total_invested, Decimal::from(40));
        assert_eq!(report.cities[1].expected_profit, Decimal::from(20));
        assert_eq!(report.cities[1].total_expenses, Decimal::from(3));

        assert_eq!(report.total_items, 2);
        assert_eq!(report.total_quantity, 5);
        assert_eq!(report.total_invested, Decimal::from(140));
        assert_eq!(report.expected_profit, Decimal::from(50));
    }

    #[test]
    fn test_include_sold() {
        let report = summarize_stock(&sample(), &names(), true);

        let omsk = &report.cities[1];
        assert_eq!(omsk.items, 2);
        assert_eq!(omsk.quantity, 6);
        assert_eq!(omsk.total_invested, Decimal::from(80));
        assert_eq!(omsk.total_expenses, Decimal::from(11));
        assert_eq!(report.total_items, 3);
    }

    #[test]
    fn test_empty_stock() {
        let report = summarize_stock(&[], &names(), false);
        assert!(report.cities.is_empty());
        assert_eq!(report.total_quantity, 0);
        assert_eq!(report.total_invested, Decimal::ZERO);
    }
}

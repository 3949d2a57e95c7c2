use std::collections::{BTreeMap, HashMap};

use common::{CitySalesSummary, SalesTotals};
use rust_decimal::Decimal;
use tracing::{instrument, trace};

use crate::{city_name, money};
use crate::sales::SaleRecord;

#[derive(Default)]
struct Accumulator {
    count: usize,
    total_buy: Decimal,
    total_sell: Decimal,
    total_expenses: Decimal,
}

impl Accumulator {
    fn add(&mut self, record: &SaleRecord) {
        self.count += 1;
        self.total_buy += record.sale.buy_price;
        self.total_sell += record.sale.sell_price;
        self.total_expenses += record.total_expenses();
    }

    fn gross_profit(&self) -> Decimal {
        self.total_sell - self.total_buy
    }
}

/// Groups sales by city name, ordered by name, with overall totals.
#[instrument(skip_all, fields(num_sales = sales.len()))]
pub fn summarize_by_city(
    sales: &[SaleRecord],
    city_names: &HashMap<i32, String>,
) -> (Vec<CitySalesSummary>, SalesTotals) {
    let mut by_city: BTreeMap<&str, Accumulator> = BTreeMap::new();
    let mut overall = Accumulator::default();

    for record in sales {
        let city = city_name(city_names, record.sale.city_id);
        trace!("Sale {} counted for city '{}'", record.sale.id, city);

        by_city.entry(city).or_default().add(record);
        overall.add(record);
    }

    let cities = by_city
        .into_iter()
        .map(|(city, acc)| CitySalesSummary {
            city: city.to_string(),
            count: acc.count,
            total_buy: money(acc.total_buy),
            total_sell: money(acc.total_sell),
            total_expenses: money(acc.total_expenses),
            gross_profit: money(acc.gross_profit()),
            net_profit: money(acc.gross_profit() - acc.total_expenses),
        })
        .collect();

    let totals = SalesTotals {
        count: overall.count,
        total_buy: money(overall.total_buy),
        total_sell: money(overall.total_sell),
        total_expenses: money(overall.total_expenses),
        gross_profit: money(overall.gross_profit()),
        net_profit: money(overall.gross_profit() - overall.total_expenses),
    };

    (cities, totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::testing::*;

    #[test]
    fn test_summarize_by_city() {
        let names = HashMap::from([(1, "Omsk".to_string()), (2, "Chita".to_string())]);
        let sales = vec![
            record(1, 1, date(2025, 1, 4), 100, 160, &[(1, 10)]),
            record(2, 2, date(2025, 2, 4), 30, 50, &[]),
            record(3, 1, date(2026, 3, 4), 20, 70, &[(1, 5), (2, 5)]),
        ];

        let (cities, totals) = summarize_by_city(&sales, &names);

        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].city, "Chita");
        assert_eq!(cities[0].count, 1);
        assert_eq!(cities[0].gross_profit, dec(20));
        assert_eq!(cities[0].net_profit, dec(20));

        assert_eq!(cities[1].city, "Omsk");
        assert_eq!(cities[1].count, 2);
        assert_eq!(cities[1].total_buy, dec(120));
        assert_eq!(cities[1].total_sell, dec(230));
        assert_eq!(cities[1].total_expenses, dec(20));
        assert_eq!(cities[1].gross_profit, dec(110));
        assert_eq!(cities[1].net_profit, dec(90));

        assert_eq!(totals.count, 3);
        assert_eq!(totals.total_sell, dec(280));
        assert_eq!(totals.net_profit, dec(110));
    }

    #[test]
    fn test_summarize_nothing() {
        let (cities, totals) = summarize_by_city(&[], &HashMap::new());
        assert!(cities.is_empty());
        assert_eq!(totals, SalesTotals::default());
    }
}

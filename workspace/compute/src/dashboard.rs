use common::PeriodTotals;
use model::entities::general_expense;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::money;
use crate::sales::SaleRecord;

/// Totals over the sales and general expenses of one period.
///
/// Both slices must already be restricted to the period.
#[instrument(skip(sales, general), fields(num_sales = sales.len(), num_general = general.len()))]
pub fn period_totals(sales: &[SaleRecord], general: &[general_expense::Model]) -> PeriodTotals {
    let gross_income: Decimal = sales.iter().map(|r| r.sale.sell_price).sum();
    let total_buy: Decimal = sales.iter().map(|r| r.sale.buy_price).sum();
    let sale_expenses: Decimal = sales.iter().map(SaleRecord::total_expenses).sum();
    let general_expenses: Decimal = general.iter().map(|g| g.amount).sum();
    let net_profit = gross_income - total_buy - sale_expenses - general_expenses;

    debug!("Period net profit: {}", net_profit);

    PeriodTotals {
        count_sales: sales.len(),
        gross_income: money(gross_income),
        total_buy: money(total_buy),
        sale_expenses: money(sale_expenses),
        general_expenses: money(general_expenses),
        net_profit: money(net_profit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::testing::*;

    #[test]
    fn test_period_totals() {
        let sales = vec![
            record(1, 1, date(2026, 10, 1), 100, 180, &[(1, 15), (2, 5)]),
            record(2, 2, date(2026, 10, 9), 40, 60, &[]),
        ];
        let general = vec![general(1, 3, date(2026, 10, 3), 25, None)];

        let totals = period_totals(&sales, &general);

        assert_eq!(totals.count_sales, 2);
        assert_eq!(totals.gross_income, dec(240));
        assert_eq!(totals.total_buy, dec(140));
        assert_eq!(totals.sale_expenses, dec(20));
        assert_eq!(totals.general_expenses, dec(25));
        assert_eq!(totals.net_profit, dec(55));
    }

    #[test]
    fn test_period_totals_can_be_negative() {
        let general = vec![general(1, 3, date(2026, 10, 3), 300, Some(1))];
        let totals = period_totals(&[], &general);

        assert_eq!(totals.count_sales, 0);
        assert_eq!(totals.net_profit, dec(-300));
    }

    #[test]
    fn test_amounts_are_rounded_to_cents() {
        let mut sale = record(1, 1, date(2026, 10, 1), 0, 0, &[]);
        sale.sale.sell_price = Decimal::new(100_005, 4);

        let totals = period_totals(&[sale], &[]);
        assert_eq!(totals.gross_income, Decimal::new(1000, 2));
    }
}

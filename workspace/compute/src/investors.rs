//! What each investor has funded in stock and earned through sales.

use std::collections::HashMap;

use common::{InvestorReport, InvestorSummary};
use model::entities::investor;
use rust_decimal::Decimal;
use tracing::{instrument, trace};

use crate::money;
use crate::sales::SaleRecord;
use crate::stock::StockRecord;

#[derive(Default)]
struct Accumulator {
    items: usize,
    quantity: i64,
    sold_items: usize,
    total_invested: Decimal,
    expected_profit: Decimal,
    stock_expenses: Decimal,
    sales_count: usize,
    sales_net_profit: Decimal,
}

/// One entry per investor, ordered by name then id.
///
/// Stock and sales without an investor are not counted.
#[instrument(skip_all, fields(num_investors = investors.len(), num_stock = stock.len(), num_sales = sales.len()))]
pub fn summarize_investors(
    investors: &[investor::Model],
    stock: &[StockRecord],
    sales: &[SaleRecord],
) -> InvestorReport {
    let mut by_investor: HashMap<i32, Accumulator> = investors
        .iter()
        .map(|i| (i.id, Accumulator::default()))
        .collect();

    for record in stock {
        let Some(acc) = record
            .item
            .investor_id
            .and_then(|id| by_investor.get_mut(&id))
        else {
            continue;
        };
        acc.items += 1;
        acc.quantity += i64::from(record.item.quantity);
        if record.item.sold {
            acc.sold_items += 1;
        }
        acc.total_invested += record.item.total_invested();
        acc.expected_profit += record.item.expected_profit();
        acc.stock_expenses += record.total_expenses();
    }

    for record in sales {
        if let Some(acc) = record
            .sale
            .investor_id
            .and_then(|id| by_investor.get_mut(&id))
        {
            trace!("Sale {} counted for investor", record.sale.id);
            acc.sales_count += 1;
            acc.sales_net_profit += record.profit();
        }
    }

    let mut ordered: Vec<&investor::Model> = investors.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let summaries: Vec<InvestorSummary> = ordered
        .into_iter()
        .map(|inv| {
            let acc = by_investor.remove(&inv.id).unwrap_or_default();
            InvestorSummary {
                investor_id: inv.id,
                name: inv.name.clone(),
                items: acc.items,
                quantity: acc.quantity,
                sold_items: acc.sold_items,
                total_invested: money(acc.total_invested),
                expected_profit: money(acc.expected_profit),
                stock_expenses: money(acc.stock_expenses),
                sales_count: acc.sales_count,
                sales_net_profit: money(acc.sales_net_profit),
            }
        })
        .collect();

    InvestorReport {
        total_invested: summaries.iter().map(|s| s.total_invested).sum(),
        expected_profit: summaries.iter().map(|s| s.expected_profit).sum(),
        investors: summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::testing::{date, dec, record};
    use crate::stock::testing::stock;

    fn investor(id: i32, name: &str) -> investor::Model {
        investor::Model {
            id,
            name: name.to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_summarize_investors() {
        let investors = vec![investor(1, "Viktor"), investor(2, "Alla")];
        let stock = vec![
            stock(1, 1, Some(1), 10, 20, 3, false, &[2]),
            stock(2, 1, Some(1), 50, 80, 1, true, &[]),
            stock(3, 1, None, 999, 1000, 1, false, &[]),
        ];
        let mut funded_sale = record(1, 1, date(2026, 10, 1), 50, 90, &[(1, 10)]);
        funded_sale.sale.investor_id = Some(1);
        let sales = vec![funded_sale, record(2, 1, date(2026, 10, 2), 1, 2, &[])];

        let report = summarize_investors(&investors, &stock, &sales);

        assert_eq!(report.investors.len(), 2);
        let alla = &report.investors[0];
        assert_eq!(alla.name, "Alla");
        assert_eq!(alla.items, 0);
        assert_eq!(alla.total_invested, Decimal::ZERO);

        let viktor = &report.investors[1];
        assert_eq!(viktor.investor_id, 1);
        assert_eq!(viktor.items, 2);
        assert_eq!(viktor.quantity, 4);
        assert_eq!(viktor.sold_items, 1);
        assert_eq!(viktor.total_invested, dec(80));
        assert_eq!(viktor.expected_profit, dec(60));
        assert_eq!(viktor.stock_expenses, dec(2));
        assert_eq!(viktor.sales_count, 1);
        assert_eq!(viktor.sales_net_profit, dec(30));

        assert_eq!(report.total_invested, dec(80));
        assert_eq!(report.expected_profit, dec(60));
    }

    #[test]
    fn test_same_name_ordered_by_id() {
        let investors = vec![investor(5, "Oleg"), investor(3, "Oleg")];
        let report = summarize_investors(&investors, &[], &[]);
        let ids: Vec<i32> = report.investors.iter().map(|s| s.investor_id).collect();
        assert_eq!(ids, vec![3, 5]);
    }
}

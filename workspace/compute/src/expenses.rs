//! Expense breakdown by type over sale and general expenses.

use std::collections::HashMap;

use common::ExpenseTypeTotal;
use model::entities::general_expense;
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::money;
use crate::sales::SaleRecord;

const UNKNOWN_TYPE: &str = "Unknown";

/// Sums sale expenses and general expenses per expense type name.
///
/// Largest amount first, equal amounts by name.
#[instrument(skip_all, fields(num_sales = sales.len(), num_general = general.len()))]
pub fn expenses_by_type(
    sales: &[SaleRecord],
    general: &[general_expense::Model],
    type_names: &HashMap<i32, String>,
) -> Vec<ExpenseTypeTotal> {
    let mut by_type: HashMap<&str, Decimal> = HashMap::new();

    let name_of = move |type_id: i32| match type_names.get(&type_id) {
        Some(name) => name.as_str(),
        None => {
            warn!("Expense type {} not found, counting as {}", type_id, UNKNOWN_TYPE);
            UNKNOWN_TYPE
        }
    };

    let amounts = sales
        .iter()
        .flat_map(|r| r.expenses.iter().map(|e| (e.expense_type_id, e.amount)))
        .chain(general.iter().map(|g| (g.expense_type_id, g.amount)));

    for (type_id, amount) in amounts {
        *by_type.entry(name_of(type_id)).or_insert(Decimal::ZERO) += amount;
    }

    let mut totals: Vec<ExpenseTypeTotal> = by_type
        .into_iter()
        .map(|(name, amount)| ExpenseTypeTotal {
            expense_type: name.to_string(),
            amount: money(amount),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.expense_type.cmp(&b.expense_type))
    });

    totals
}

/// Sum over a breakdown.
pub fn total_expenses(breakdown: &[ExpenseTypeTotal]) -> Decimal {
    breakdown.iter().map(|t| t.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::testing::*;

    fn types() -> HashMap<i32, String> {
        HashMap::from([
            (1, "Delivery".to_string()),
            (2, "Repair".to_string()),
            (3, "Rent".to_string()),
        ])
    }

    #[test]
    fn test_groups_sale_and_general_expenses() {
        let sales = vec![
            record(1, 1, date(2026, 10, 1), 10, 20, &[(1, 15), (2, 40)]),
            record(2, 1, date(2026, 10, 2), 10, 20, &[(1, 10)]),
        ];
        let general = vec![
            general(1, 3, date(2026, 10, 5), 100, None),
            general(2, 1, date(2026, 10, 6), 5, None),
        ];

        let breakdown = expenses_by_type(&sales, &general, &types());

        assert_eq!(
            breakdown,
            vec![
                ExpenseTypeTotal {
                    expense_type: "Rent".to_string(),
                    amount: dec(100),
                },
                ExpenseTypeTotal {
                    expense_type: "Repair".to_string(),
                    amount: dec(40),
                },
                ExpenseTypeTotal {
                    expense_type: "Delivery".to_string(),
                    amount: dec(30),
                },
            ]
        );
        assert_eq!(total_expenses(&breakdown), dec(170));
    }

    #[test]
    fn test_equal_amounts_sorted_by_name() {
        let general = vec![
            general(1, 3, date(2026, 10, 5), 50, None),
            general(2, 1, date(2026, 10, 6), 50, None),
        ];

        let breakdown = expenses_by_type(&[], &general, &types());
        let names: Vec<&str> = breakdown.iter().map(|t| t.expense_type.as_str()).collect();

        assert_eq!(names, vec!["Delivery", "Rent"]);
    }

    #[test]
    fn test_missing_type_is_grouped_as_unknown() {
        let general = vec![general(1, 42, date(2026, 10, 5), 7, None)];
        let breakdown = expenses_by_type(&[], &general, &types());

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].expense_type, "Unknown");
    }

    #[test]
    fn test_no_expenses() {
        let breakdown = expenses_by_type(&[], &[], &types());
        assert!(breakdown.is_empty());
        assert_eq!(total_expenses(&breakdown), Decimal::ZERO);
    }
}

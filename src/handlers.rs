pub mod cities;
pub mod employees;
pub mod expense_types;
pub mod general_expenses;
pub mod health;
pub mod investors;
pub mod reports;
pub mod sales;
pub mod stock_items;

use model::entities::expense_type;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::trace;
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ApiResult;
use crate::helpers::lookups::ensure_exists;
use crate::helpers::validation::validate_amount;

/// One expense row of a sale or stock item form.
///
/// Rows without a type or an amount are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct ExpenseLine {
    /// Expense type ID
    pub expense_type_id: Option<i32>,
    /// Amount spent
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<Decimal>,
    /// Optional note
    pub comment: Option<String>,
}

/// An expense row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseLineResponse {
    pub id: i32,
    pub expense_type_id: i32,
    pub expense_type: String,
    pub amount: Decimal,
    pub comment: Option<String>,
}

/// An expense line with both type and amount present.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilledLine {
    pub expense_type_id: i32,
    pub amount: Decimal,
    pub comment: Option<String>,
}

pub(crate) fn filled_lines(lines: &[ExpenseLine]) -> Vec<FilledLine> {
    lines
        .iter()
        .filter_map(|line| match (line.expense_type_id, line.amount) {
            (Some(expense_type_id), Some(amount)) => Some(FilledLine {
                expense_type_id,
                amount,
                comment: clean_text(line.comment.as_deref()),
            }),
            _ => {
                trace!("Skipping incomplete expense line: {:?}", line);
                None
            }
        })
        .collect()
}

/// Every line must reference an existing expense type.
pub(crate) async fn ensure_expense_types(
    db: &DatabaseConnection,
    lines: &[FilledLine],
) -> ApiResult<()> {
    for line in lines {
        ensure_exists::<expense_type::Entity>(db, line.expense_type_id, "Expense type").await?;
    }
    Ok(())
}

/// Trims free text; blank values become `None`.
pub(crate) fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_lines_are_skipped() {
        let lines = vec![
            ExpenseLine {
                expense_type_id: Some(1),
                amount: Some(Decimal::new(1500, 2)),
                comment: Some("  courier ".to_string()),
            },
            ExpenseLine {
                expense_type_id: None,
                amount: Some(Decimal::new(100, 2)),
                comment: None,
            },
            ExpenseLine {
                expense_type_id: Some(2),
                amount: None,
                comment: Some("forgot the amount".to_string()),
            },
        ];

        let filled = filled_lines(&lines);

        assert_eq!(
            filled,
            vec![FilledLine {
                expense_type_id: 1,
                amount: Decimal::new(1500, 2),
                comment: Some("courier".to_string()),
            }]
        );
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  ")), None);
        assert_eq!(clean_text(None), None);
        assert_eq!(clean_text(Some(" CAM-1 ")), Some("CAM-1".to_string()));
    }
}

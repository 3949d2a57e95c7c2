use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::period::ReportPeriod;

/// Sums over the sales and general expenses of one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodTotals {
    /// Number of sales in the period
    pub count_sales: usize,
    /// Sum of sell prices
    pub gross_income: Decimal,
    /// Sum of buy prices
    pub total_buy: Decimal,
    /// Sum of expenses attached to the sales
    pub sale_expenses: Decimal,
    /// Sum of general expenses
    pub general_expenses: Decimal,
    /// gross_income - total_buy - sale_expenses - general_expenses
    pub net_profit: Decimal,
}

/// Dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardReport {
    pub period: ReportPeriod,
    pub totals: PeriodTotals,
    /// Years that have at least one sale, newest first
    pub all_years: Vec<i32>,
}

/// Total spent on one expense type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseTypeTotal {
    pub expense_type: String,
    pub amount: Decimal,
}

/// Expenses-by-type payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseReport {
    pub period: ReportPeriod,
    /// City name or "all"
    pub city_filter: String,
    /// Largest amount first
    pub expense_by_type: Vec<ExpenseTypeTotal>,
    pub total_expenses: Decimal,
    pub gross_income: Decimal,
    pub total_buy: Decimal,
    /// gross_income - total_buy - total_expenses
    pub net_profit: Decimal,
    pub all_years: Vec<i32>,
    pub all_cities: Vec<String>,
}

/// Sales figures of one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CitySalesSummary {
    pub city: String,
    pub count: usize,
    pub total_buy: Decimal,
    pub total_sell: Decimal,
    pub total_expenses: Decimal,
    /// total_sell - total_buy
    pub gross_profit: Decimal,
    /// gross_profit - total_expenses
    pub net_profit: Decimal,
}

/// Sales figures over all listed cities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesTotals {
    pub count: usize,
    pub total_buy: Decimal,
    pub total_sell: Decimal,
    pub total_expenses: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
}

/// Per-city sales summary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesSummaryReport {
    /// "All periods" or the selected year
    pub period_label: String,
    /// Selected year, `None` for all periods
    pub selected_year: Option<i32>,
    /// City name or "all"
    pub selected_city: String,
    /// Ordered by city name
    pub cities: Vec<CitySalesSummary>,
    pub totals: SalesTotals,
    pub all_years: Vec<i32>,
    pub all_cities: Vec<String>,
}

/// Current-month figures shown next to the sales listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesListMetrics {
    pub period_label: String,
    pub count_sales: usize,
    pub gross_income: Decimal,
    /// Sale expenses plus general expenses of the month
    pub total_expenses: Decimal,
    pub net_profit_month: Decimal,
}

/// Stock figures of one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockCitySummary {
    pub city: String,
    /// Number of stock rows
    pub items: usize,
    /// Sum of quantities
    pub quantity: i64,
    pub total_invested: Decimal,
    pub expected_profit: Decimal,
    pub total_expenses: Decimal,
}

/// Stock summary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockReport {
    /// Whether sold items were counted
    pub include_sold: bool,
    pub cities: Vec<StockCitySummary>,
    pub total_items: usize,
    pub total_quantity: i64,
    pub total_invested: Decimal,
    pub expected_profit: Decimal,
}

/// What one investor has funded and earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvestorSummary {
    pub investor_id: i32,
    pub name: String,
    /// Stock rows funded by the investor
    pub items: usize,
    pub quantity: i64,
    pub sold_items: usize,
    pub total_invested: Decimal,
    pub expected_profit: Decimal,
    pub stock_expenses: Decimal,
    /// Sales linked to the investor
    pub sales_count: usize,
    pub sales_net_profit: Decimal,
}

/// Investor summary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvestorReport {
    /// Ordered by investor name
    pub investors: Vec<InvestorSummary>,
    pub total_invested: Decimal,
    pub expected_profit: Decimal,
}

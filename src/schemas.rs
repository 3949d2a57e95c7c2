use chrono::NaiveDate;
use common::{
    CitySalesSummary, DashboardReport, ExpenseReport, ExpenseTypeTotal,
    InvestorReport, InvestorSummary, PeriodTotals, PeriodType, ReportPeriod, SalesListMetrics,
    SalesSummaryReport, SalesTotals, StockCitySummary, StockReport,
};
use compute::PeriodSelection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::handlers::{
    cities::{CityRequest, CityResponse},
    employees::{EmployeeRequest, EmployeeResponse},
    expense_types::{ExpenseTypeRequest, ExpenseTypeResponse},
    general_expenses::{GeneralExpenseList, GeneralExpenseRequest, GeneralExpenseResponse},
    investors::{InvestorRequest, InvestorResponse},
    sales::{SaleListResponse, SaleRequest, SaleResponse},
    stock_items::{CreateStockItemRequest, StockItemResponse, UpdateStockItemRequest},
    ExpenseLine, ExpenseLineResponse,
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Report cache, keyed by report name and query
    pub cache: Cache<String, CachedData>,
    /// Bumped by every write; part of every report cache key
    pub generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, cache: Cache<String, CachedData>) -> Self {
        Self {
            db,
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cache key for a report, scoped to the current write generation.
    ///
    /// A report computed from rows loaded before a write is stored under the
    /// old generation, which later lookups never ask for.
    pub fn report_key(&self, key: impl std::fmt::Display) -> String {
        format!("{}:{}", self.generation.load(Ordering::SeqCst), key)
    }

    /// Drops every cached report. Called after each write.
    pub fn invalidate_reports(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Invalidating {} cached reports, generation {}",
            self.cache.entry_count(),
            generation
        );
        self.cache.invalidate_all();
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Dashboard(DashboardReport),
    Expenses(ExpenseReport),
    SalesSummary(SalesSummaryReport),
    Stock(StockReport),
    Investors(InvestorReport),
}

/// Period selection shared by the dashboard, expense report and
/// general expense listing.
///
/// All values are kept as text: empty or malformed values count as missing
/// and select the current month instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// "current_month" (default) or "custom"
    pub period_type: Option<String>,
    /// Year of the month to show
    pub year: Option<String>,
    /// Month (1-12) to show
    pub month: Option<String>,
    /// First day of a custom range (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last day of a custom range, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// City name, or "all" / empty for every city
    #[validate(length(max = 255))]
    pub city: Option<String>,
}

impl PeriodQuery {
    pub fn selection(&self) -> PeriodSelection {
        PeriodSelection {
            period_type: self.period_type.clone(),
            year: self.year.as_deref().and_then(|y| y.trim().parse().ok()),
            month: self.month.as_deref().and_then(|m| m.trim().parse().ok()),
            start_date: parse_date(self.start_date.as_deref()),
            end_date: parse_date(self.end_date.as_deref()),
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Query parameters of the per-city sales summary
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// A year or "all" (default)
    pub year: Option<String>,
    /// City name, or "all" / empty for every city
    #[validate(length(max = 255))]
    pub city: Option<String>,
}

/// Query parameters of the stock summary
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockReportQuery {
    /// Count items already marked as sold (default: false)
    pub include_sold: Option<bool>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::cities::create_city,
        crate::handlers::cities::get_cities,
        crate::handlers::cities::get_city,
        crate::handlers::cities::update_city,
        crate::handlers::cities::delete_city,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::get_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::investors::create_investor,
        crate::handlers::investors::get_investors,
        crate::handlers::investors::get_investor,
        crate::handlers::investors::update_investor,
        crate::handlers::investors::delete_investor,
        crate::handlers::expense_types::create_expense_type,
        crate::handlers::expense_types::get_expense_types,
        crate::handlers::expense_types::get_expense_type,
        crate::handlers::expense_types::update_expense_type,
        crate::handlers::expense_types::delete_expense_type,
        crate::handlers::sales::create_sale,
        crate::handlers::sales::get_sales,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::update_sale,
        crate::handlers::sales::delete_sale,
        crate::handlers::stock_items::create_stock_item,
        crate::handlers::stock_items::get_stock_items,
        crate::handlers::stock_items::get_stock_item,
        crate::handlers::stock_items::update_stock_item,
        crate::handlers::stock_items::delete_stock_item,
        crate::handlers::general_expenses::create_general_expense,
        crate::handlers::general_expenses::get_general_expenses,
        crate::handlers::general_expenses::get_general_expense,
        crate::handlers::general_expenses::update_general_expense,
        crate::handlers::general_expenses::delete_general_expense,
        crate::handlers::reports::get_dashboard,
        crate::handlers::reports::get_expense_report,
        crate::handlers::reports::get_sales_summary,
        crate::handlers::reports::get_stock_report,
        crate::handlers::reports::get_investor_report,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            PeriodQuery,
            SummaryQuery,
            StockReportQuery,
            CityRequest,
            CityResponse,
            EmployeeRequest,
            EmployeeResponse,
            InvestorRequest,
            InvestorResponse,
            ExpenseTypeRequest,
            ExpenseTypeResponse,
            ExpenseLine,
            ExpenseLineResponse,
            SaleRequest,
            SaleResponse,
            SaleListResponse,
            CreateStockItemRequest,
            UpdateStockItemRequest,
            StockItemResponse,
            GeneralExpenseRequest,
            GeneralExpenseResponse,
            GeneralExpenseList,
            PeriodType,
            ReportPeriod,
            PeriodTotals,
            DashboardReport,
            ExpenseTypeTotal,
            ExpenseReport,
            CitySalesSummary,
            SalesTotals,
            SalesSummaryReport,
            SalesListMetrics,
            StockCitySummary,
            StockReport,
            InvestorSummary,
            InvestorReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cities", description = "City lookup table"),
        (name = "employees", description = "Employee lookup table"),
        (name = "investors", description = "Investors funding stock"),
        (name = "expense-types", description = "Expense type lookup table"),
        (name = "sales", description = "Closed sales and their expenses"),
        (name = "stock", description = "Stock inventory and its expenses"),
        (name = "general-expenses", description = "Expenses not tied to a sale"),
        (name = "reports", description = "Aggregated reports"),
    ),
    info(
        title = "Tradebook API",
        description = "Bookkeeping for a resale business: sales, stock, expenses and reports",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

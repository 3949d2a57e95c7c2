//! Transport-layer types shared by the report computations and the HTTP
//! handlers. Amounts are exact decimals and serialize as strings.

mod period;
mod reports;

pub use period::{PeriodType, ReportPeriod};
pub use reports::{
    CitySalesSummary, DashboardReport, ExpenseReport, ExpenseTypeTotal, InvestorReport,
    InvestorSummary, PeriodTotals, SalesListMetrics, SalesSummaryReport, SalesTotals,
    StockCitySummary, StockReport,
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

//! Aggregated reports. Rows are loaded per request, reduced in `compute`
//! and cached until the next write.

use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::{
    ApiResponse, DashboardReport, ExpenseReport, InvestorReport, SalesSummaryReport, StockReport,
};
use compute::{
    dashboard::period_totals,
    expenses::{expenses_by_type, total_expenses},
    investors::summarize_investors,
    money,
    period::{resolve_period, year_interval},
    stock::summarize_stock,
    summary::summarize_by_city,
    years::{available_years, years_or_current},
    YearFilter,
};
use model::entities::investor;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use tracing::{debug, info, instrument, trace};

use crate::errors::ApiResult;
use crate::helpers::lookups::{
    city_names, expense_type_names, resolve_city_filter, sorted_city_names, CityFilter,
};
use crate::helpers::queries::{load_general_expenses, load_sales, load_stock, sale_dates, StockFilter};
use crate::helpers::today;
use crate::schemas::{
    AppState, CachedData, ErrorResponse, PeriodQuery, StockReportQuery, SummaryQuery,
};

/// Period totals over all cities
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    tag = "reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Dashboard computed successfully", body = ApiResponse<DashboardReport>),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    Valid(Query(query)): Valid<Query<PeriodQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DashboardReport>>> {
    trace!("Entering get_dashboard function");
    let today = today();
    let selection = query.selection();
    let cache_key = state.report_key(format_args!("dashboard:{:?}:{}", selection, today));

    if let Some(CachedData::Dashboard(report)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(report, "Dashboard retrieved from cache")));
    }

    let period = resolve_period(&selection, today)?;
    let interval = Some((period.start, period.end));
    let sales = load_sales(&state.db, interval, &CityFilter::All).await?;
    let general = load_general_expenses(&state.db, interval, &CityFilter::All).await?;

    let report = DashboardReport {
        totals: period_totals(&sales, &general),
        all_years: years_or_current(sale_dates(&state.db).await?, today),
        period,
    };
    info!(
        "Dashboard for {}: {} sales, net profit {}",
        report.period.label, report.totals.count_sales, report.totals.net_profit
    );

    state
        .cache
        .insert(cache_key, CachedData::Dashboard(report.clone()))
        .await;

    Ok(Json(ApiResponse::ok(report, "Dashboard computed successfully")))
}

/// Expenses grouped by type for a period and city
#[utoipa::path(
    get,
    path = "/api/v1/reports/expenses",
    tag = "reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Expense report computed successfully", body = ApiResponse<ExpenseReport>),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense_report(
    Valid(Query(query)): Valid<Query<PeriodQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ExpenseReport>>> {
    trace!("Entering get_expense_report function");
    let today = today();
    let selection = query.selection();
    let cache_key = state.report_key(format_args!("expenses:{:?}:{:?}:{}", selection, query.city, today));

    if let Some(CachedData::Expenses(report)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(
            report,
            "Expense report retrieved from cache",
        )));
    }

    let period = resolve_period(&selection, today)?;
    let interval = Some((period.start, period.end));
    let city_filter = resolve_city_filter(&state.db, query.city.as_deref()).await?;
    let sales = load_sales(&state.db, interval, &city_filter).await?;
    let general = load_general_expenses(&state.db, interval, &city_filter).await?;

    let breakdown = expenses_by_type(&sales, &general, &expense_type_names(&state.db).await?);
    let total = total_expenses(&breakdown);
    let gross_income: Decimal = sales.iter().map(|r| r.sale.sell_price).sum();
    let total_buy: Decimal = sales.iter().map(|r| r.sale.buy_price).sum();

    let report = ExpenseReport {
        period,
        city_filter: city_filter.label(),
        expense_by_type: breakdown,
        total_expenses: total,
        gross_income: money(gross_income),
        total_buy: money(total_buy),
        net_profit: money(gross_income - total_buy - total),
        all_years: years_or_current(sale_dates(&state.db).await?, today),
        all_cities: sorted_city_names(&state.db).await?,
    };
    info!(
        "Expense report for {} ({}): {} types, total {}",
        report.period.label,
        report.city_filter,
        report.expense_by_type.len(),
        report.total_expenses
    );

    state
        .cache
        .insert(cache_key, CachedData::Expenses(report.clone()))
        .await;

    Ok(Json(ApiResponse::ok(
        report,
        "Expense report computed successfully",
    )))
}

/// Sales per city for one year or all time
#[utoipa::path(
    get,
    path = "/api/v1/reports/sales-summary",
    tag = "reports",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Sales summary computed successfully", body = ApiResponse<SalesSummaryReport>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_sales_summary(
    Valid(Query(query)): Valid<Query<SummaryQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SalesSummaryReport>>> {
    trace!("Entering get_sales_summary function");
    let year = YearFilter::parse(query.year.as_deref());
    let cache_key = state.report_key(format_args!("sales-summary:{:?}:{:?}", year, query.city));

    if let Some(CachedData::SalesSummary(report)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(
            report,
            "Sales summary retrieved from cache",
        )));
    }

    let interval = match year {
        YearFilter::All => None,
        YearFilter::Year(y) => Some(year_interval(y)?),
    };
    let city_filter = resolve_city_filter(&state.db, query.city.as_deref()).await?;
    let sales = load_sales(&state.db, interval, &city_filter).await?;
    let (cities, totals) = summarize_by_city(&sales, &city_names(&state.db).await?);

    let report = SalesSummaryReport {
        period_label: year.label(),
        selected_year: year.year(),
        selected_city: city_filter.label(),
        cities,
        totals,
        all_years: available_years(sale_dates(&state.db).await?),
        all_cities: sorted_city_names(&state.db).await?,
    };
    info!(
        "Sales summary for {} ({}): {} cities, {} sales",
        report.period_label,
        report.selected_city,
        report.cities.len(),
        report.totals.count
    );

    state
        .cache
        .insert(cache_key, CachedData::SalesSummary(report.clone()))
        .await;

    Ok(Json(ApiResponse::ok(
        report,
        "Sales summary computed successfully",
    )))
}

/// Stock grouped by city
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock",
    tag = "reports",
    params(StockReportQuery),
    responses(
        (status = 200, description = "Stock report computed successfully", body = ApiResponse<StockReport>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stock_report(
    Query(query): Query<StockReportQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<StockReport>>> {
    let include_sold = query.include_sold.unwrap_or(false);
    let cache_key = state.report_key(format_args!("stock:{}", include_sold));

    if let Some(CachedData::Stock(report)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(report, "Stock report retrieved from cache")));
    }

    let records = load_stock(&state.db, &StockFilter::default()).await?;
    let report = summarize_stock(&records, &city_names(&state.db).await?, include_sold);
    info!(
        "Stock report: {} items in {} cities",
        report.total_items,
        report.cities.len()
    );

    state
        .cache
        .insert(cache_key, CachedData::Stock(report.clone()))
        .await;

    Ok(Json(ApiResponse::ok(report, "Stock report computed successfully")))
}

/// Stock and sales per investor
#[utoipa::path(
    get,
    path = "/api/v1/reports/investors",
    tag = "reports",
    responses(
        (status = 200, description = "Investor report computed successfully", body = ApiResponse<InvestorReport>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_investor_report(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<InvestorReport>>> {
    let cache_key = state.report_key("investors");

    if let Some(CachedData::Investors(report)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(
            report,
            "Investor report retrieved from cache",
        )));
    }

    let investors = investor::Entity::find()
        .order_by_asc(investor::Column::Name)
        .all(&state.db)
        .await?;
    let stock = load_stock(&state.db, &StockFilter::default()).await?;
    let sales = load_sales(&state.db, None, &CityFilter::All).await?;
    let report = summarize_investors(&investors, &stock, &sales);
    info!("Investor report over {} investors", report.investors.len());

    state
        .cache
        .insert(cache_key, CachedData::Investors(report.clone()))
        .await;

    Ok(Json(ApiResponse::ok(
        report,
        "Investor report computed successfully",
    )))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use common::{ApiResponse, SalesListMetrics};
use compute::{period::current_month, sales, SaleRecord, SaleSort};
use model::entities::{city, employee, expense, investor, sale};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::handlers::{
    clean_text, ensure_expense_types, filled_lines, ExpenseLine, ExpenseLineResponse, FilledLine,
};
use crate::helpers::lookups::{
    ensure_exists, ensure_optional_exists, resolve_city_filter, sorted_city_names, Lookups,
};
use crate::helpers::queries::{load_general_expenses, load_sales};
use crate::helpers::today;
use crate::helpers::validation::{validate_amount, validate_not_blank, validate_photo};
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating or replacing a sale
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct SaleRequest {
    /// Product name
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub product_name: String,
    /// Article or serial number
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub buy_price: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub sell_price: Decimal,
    pub city_id: i32,
    pub employee_id: i32,
    /// Investor whose stock was sold
    pub investor_id: Option<i32>,
    /// Sale date (YYYY-MM-DD). Today when creating, unchanged when updating.
    pub date: Option<NaiveDate>,
    /// Photo file name
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<String>,
    /// Expense rows; incomplete rows are ignored
    #[serde(default)]
    #[validate(nested)]
    pub expenses: Vec<ExpenseLine>,
}

/// Sale response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleResponse {
    pub id: i32,
    pub product_name: String,
    pub reference: Option<String>,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub city_id: i32,
    pub city: String,
    pub employee_id: i32,
    pub employee: String,
    pub investor_id: Option<i32>,
    pub investor: Option<String>,
    pub date: NaiveDate,
    pub photo: Option<String>,
    pub expenses: Vec<ExpenseLineResponse>,
    pub total_expenses: Decimal,
    /// sell_price - buy_price
    pub gross_profit: Decimal,
    /// gross_profit - total_expenses
    pub profit: Decimal,
}

impl SaleResponse {
    fn new(record: SaleRecord, lookups: &Lookups) -> Self {
        let total_expenses = record.total_expenses();
        let gross_profit = record.gross_profit();
        let profit = record.profit();
        let SaleRecord { sale, expenses } = record;

        Self {
            id: sale.id,
            product_name: sale.product_name,
            reference: sale.reference,
            buy_price: sale.buy_price,
            sell_price: sale.sell_price,
            city_id: sale.city_id,
            city: lookups.city(sale.city_id),
            employee_id: sale.employee_id,
            employee: lookups.employee(sale.employee_id),
            investor_id: sale.investor_id,
            investor: lookups.investor(sale.investor_id),
            date: sale.date,
            photo: sale.photo,
            expenses: expenses
                .into_iter()
                .map(|e| ExpenseLineResponse {
                    id: e.id,
                    expense_type_id: e.expense_type_id,
                    expense_type: lookups.expense_type(e.expense_type_id),
                    amount: e.amount,
                    comment: e.comment,
                })
                .collect(),
            total_expenses,
            gross_profit,
            profit,
        }
    }
}

/// Query parameters of the sale listing
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    /// date_desc (default), date_asc, sell_desc, sell_asc, city, profit_desc, profit_asc
    pub sort: Option<String>,
    /// City name, or "all" / empty for every city
    #[validate(length(max = 255))]
    pub city: Option<String>,
}

/// Sale listing with the figures of the current month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleListResponse {
    pub sales: Vec<SaleResponse>,
    /// Applied sort key
    pub sort: String,
    /// City name or "all"
    pub city_filter: String,
    /// Net profit of all listed sales
    pub total_profit: Decimal,
    /// Current month, restricted to the city filter
    pub metrics: SalesListMetrics,
    pub all_cities: Vec<String>,
}

async fn check_references(state: &AppState, request: &SaleRequest) -> ApiResult<Vec<FilledLine>> {
    ensure_exists::<city::Entity>(&state.db, request.city_id, "City").await?;
    ensure_exists::<employee::Entity>(&state.db, request.employee_id, "Employee").await?;
    ensure_optional_exists::<investor::Entity>(&state.db, request.investor_id, "Investor").await?;

    let lines = filled_lines(&request.expenses);
    ensure_expense_types(&state.db, &lines).await?;
    Ok(lines)
}

async fn insert_expenses<C: ConnectionTrait>(
    db: &C,
    sale_id: i32,
    lines: Vec<FilledLine>,
) -> Result<Vec<expense::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = expense::ActiveModel {
            sale_id: Set(sale_id),
            expense_type_id: Set(line.expense_type_id),
            amount: Set(line.amount),
            comment: Set(line.comment),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

/// Record a sale with its expenses
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    tag = "sales",
    request_body = SaleRequest,
    responses(
        (status = 201, description = "Sale created successfully", body = ApiResponse<SaleResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_sale(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SaleRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SaleResponse>>)> {
    trace!("Entering create_sale function");
    let lines = check_references(&state, &request).await?;
    debug!("Creating sale '{}' with {} expenses", request.product_name, lines.len());

    let txn = state.db.begin().await?;
    let model = sale::ActiveModel {
        product_name: Set(request.product_name.trim().to_string()),
        reference: Set(clean_text(request.reference.as_deref())),
        buy_price: Set(request.buy_price),
        sell_price: Set(request.sell_price),
        city_id: Set(request.city_id),
        employee_id: Set(request.employee_id),
        investor_id: Set(request.investor_id),
        date: Set(request.date.unwrap_or_else(today)),
        photo: Set(clean_text(request.photo.as_deref())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let expenses = insert_expenses(&txn, model.id, lines).await?;
    txn.commit().await?;

    info!("Sale created successfully with ID: {}", model.id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    let response = SaleResponse::new(SaleRecord::from((model, expenses)), &lookups);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(response, "Sale created successfully")),
    ))
}

/// List sales
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    tag = "sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Sales retrieved successfully", body = ApiResponse<SaleListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_sales(
    Valid(Query(query)): Valid<Query<SalesQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SaleListResponse>>> {
    trace!("Entering get_sales function");

    let sort = SaleSort::parse(query.sort.as_deref());
    let city_filter = resolve_city_filter(&state.db, query.city.as_deref()).await?;
    let lookups = Lookups::load(&state.db).await?;

    let mut records = load_sales(&state.db, None, &city_filter).await?;
    sales::sort_sales(&mut records, sort, &lookups.cities);
    let total_profit = sales::total_profit(&records);

    let month = current_month(today())?;
    let general =
        load_general_expenses(&state.db, Some((month.start, month.end)), &city_filter).await?;
    let metrics = sales::month_metrics(&records, &general, &month);

    debug!(
        "Listing {} sales sorted by {} for city {}",
        records.len(),
        sort.as_str(),
        city_filter.label()
    );

    let response = SaleListResponse {
        sales: records
            .into_iter()
            .map(|r| SaleResponse::new(r, &lookups))
            .collect(),
        sort: sort.as_str().to_string(),
        city_filter: city_filter.label(),
        total_profit,
        metrics,
        all_cities: sorted_city_names(&state.db).await?,
    };

    Ok(Json(ApiResponse::ok(
        response,
        "Sales retrieved successfully",
    )))
}

/// Get a sale by ID
#[utoipa::path(
    get,
    path = "/api/v1/sales/{sale_id}",
    tag = "sales",
    params(
        ("sale_id" = i32, Path, description = "Sale ID"),
    ),
    responses(
        (status = 200, description = "Sale retrieved successfully", body = ApiResponse<SaleResponse>),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_sale(
    Path(sale_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SaleResponse>>> {
    let model = sale::Entity::find_by_id(sale_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;
    let expenses = model.find_related(expense::Entity).all(&state.db).await?;
    let lookups = Lookups::load(&state.db).await?;

    Ok(Json(ApiResponse::ok(
        SaleResponse::new(SaleRecord::from((model, expenses)), &lookups),
        "Sale retrieved successfully",
    )))
}

/// Replace a sale and its expenses
#[utoipa::path(
    put,
    path = "/api/v1/sales/{sale_id}",
    tag = "sales",
    params(
        ("sale_id" = i32, Path, description = "Sale ID"),
    ),
    request_body = SaleRequest,
    responses(
        (status = 200, description = "Sale updated successfully", body = ApiResponse<SaleResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_sale(
    Path(sale_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SaleRequest>>,
) -> ApiResult<Json<ApiResponse<SaleResponse>>> {
    trace!("Entering update_sale function for sale_id: {}", sale_id);

    let existing = sale::Entity::find_by_id(sale_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;
    let lines = check_references(&state, &request).await?;
    let date = request.date.unwrap_or(existing.date);

    let txn = state.db.begin().await?;
    let mut active: sale::ActiveModel = existing.into();
    active.product_name = Set(request.product_name.trim().to_string());
    active.reference = Set(clean_text(request.reference.as_deref()));
    active.buy_price = Set(request.buy_price);
    active.sell_price = Set(request.sell_price);
    active.city_id = Set(request.city_id);
    active.employee_id = Set(request.employee_id);
    active.investor_id = Set(request.investor_id);
    active.date = Set(date);
    active.photo = Set(clean_text(request.photo.as_deref()));
    let model = active.update(&txn).await?;

    let removed = expense::Entity::delete_many()
        .filter(expense::Column::SaleId.eq(sale_id))
        .exec(&txn)
        .await?;
    debug!("Replaced {} expenses of sale {}", removed.rows_affected, sale_id);
    let expenses = insert_expenses(&txn, sale_id, lines).await?;
    txn.commit().await?;

    info!("Sale {} updated", sale_id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    Ok(Json(ApiResponse::ok(
        SaleResponse::new(SaleRecord::from((model, expenses)), &lookups),
        "Sale updated successfully",
    )))
}

/// Delete a sale together with its expenses
#[utoipa::path(
    delete,
    path = "/api/v1/sales/{sale_id}",
    tag = "sales",
    params(
        ("sale_id" = i32, Path, description = "Sale ID"),
    ),
    responses(
        (status = 200, description = "Sale deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_sale(
    Path(sale_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let txn = state.db.begin().await?;
    expense::Entity::delete_many()
        .filter(expense::Column::SaleId.eq(sale_id))
        .exec(&txn)
        .await?;
    let result = sale::Entity::delete_by_id(sale_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(ApiError::not_found("Sale", sale_id));
    }
    txn.commit().await?;

    info!("Sale with ID {} deleted successfully", sale_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("Sale {} deleted", sale_id),
        "Sale deleted successfully",
    )))
}

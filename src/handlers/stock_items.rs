use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ApiResponse;
use compute::StockRecord;
use model::entities::{city, investor, stock_expense, stock_item};
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
    ensure_exists, ensure_optional_exists, resolve_city_filter, CityFilter, Lookups,
};
use crate::helpers::queries::{load_stock, StockFilter};
use crate::helpers::validation::{validate_amount, validate_not_blank, validate_photo};
use crate::schemas::{AppState, ErrorResponse};

/// Request body for adding a stock item
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateStockItemRequest {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub product_name: String,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    /// Purchase price of one unit
    #[validate(custom(function = "validate_amount"))]
    pub buy_price: Decimal,
    /// Planned sell price of one unit
    #[validate(custom(function = "validate_amount"))]
    pub expected_sell_price: Decimal,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub city_id: i32,
    /// Investor who funded the purchase
    pub investor_id: Option<i32>,
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<String>,
    /// Default: false
    pub sold: Option<bool>,
    #[serde(default)]
    #[validate(nested)]
    pub expenses: Vec<ExpenseLine>,
}

/// Request body for updating a stock item; absent fields are kept
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateStockItemRequest {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub product_name: Option<String>,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub buy_price: Option<Decimal>,
    #[validate(custom(function = "validate_amount"))]
    pub expected_sell_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    pub city_id: Option<i32>,
    pub investor_id: Option<i32>,
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<String>,
    pub sold: Option<bool>,
    /// Replaces all expense rows when present
    #[validate(nested)]
    pub expenses: Option<Vec<ExpenseLine>>,
}

/// Stock item response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockItemResponse {
    pub id: i32,
    pub product_name: String,
    pub reference: Option<String>,
    pub buy_price: Decimal,
    pub expected_sell_price: Decimal,
    pub quantity: i32,
    pub city_id: i32,
    pub city: String,
    pub investor_id: Option<i32>,
    pub investor: Option<String>,
    pub photo: Option<String>,
    pub sold: bool,
    pub expenses: Vec<ExpenseLineResponse>,
    /// buy_price * quantity
    pub total_invested: Decimal,
    /// (expected_sell_price - buy_price) * quantity
    pub expected_profit: Decimal,
    pub total_expenses: Decimal,
}

impl StockItemResponse {
    fn new(record: StockRecord, lookups: &Lookups) -> Self {
        let total_expenses = record.total_expenses();
        let StockRecord { item, expenses } = record;

        Self {
            id: item.id,
            total_invested: item.total_invested(),
            expected_profit: item.expected_profit(),
            product_name: item.product_name,
            reference: item.reference,
            buy_price: item.buy_price,
            expected_sell_price: item.expected_sell_price,
            quantity: item.quantity,
            city_id: item.city_id,
            city: lookups.city(item.city_id),
            investor_id: item.investor_id,
            investor: lookups.investor(item.investor_id),
            photo: item.photo,
            sold: item.sold,
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
        }
    }
}

/// Query parameters of the stock listing
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    /// City name, or "all" / empty for every city
    #[validate(length(max = 255))]
    pub city: Option<String>,
    /// Only items funded by this investor
    pub investor_id: Option<i32>,
    /// Only sold (true) or unsold (false) items
    pub sold: Option<bool>,
}

async fn insert_stock_expenses<C: ConnectionTrait>(
    db: &C,
    stock_item_id: i32,
    lines: Vec<FilledLine>,
) -> Result<Vec<stock_expense::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = stock_expense::ActiveModel {
            stock_item_id: Set(stock_item_id),
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

/// Add a stock item with its expenses
#[utoipa::path(
    post,
    path = "/api/v1/stock",
    tag = "stock",
    request_body = CreateStockItemRequest,
    responses(
        (status = 201, description = "Stock item created successfully", body = ApiResponse<StockItemResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_stock_item(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateStockItemRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StockItemResponse>>)> {
    trace!("Entering create_stock_item function");

    ensure_exists::<city::Entity>(&state.db, request.city_id, "City").await?;
    ensure_optional_exists::<investor::Entity>(&state.db, request.investor_id, "Investor").await?;
    let lines = filled_lines(&request.expenses);
    ensure_expense_types(&state.db, &lines).await?;

    let txn = state.db.begin().await?;
    let item = stock_item::ActiveModel {
        product_name: Set(request.product_name.trim().to_string()),
        reference: Set(clean_text(request.reference.as_deref())),
        buy_price: Set(request.buy_price),
        expected_sell_price: Set(request.expected_sell_price),
        quantity: Set(request.quantity),
        city_id: Set(request.city_id),
        investor_id: Set(request.investor_id),
        photo: Set(clean_text(request.photo.as_deref())),
        sold: Set(request.sold.unwrap_or(false)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let expenses = insert_stock_expenses(&txn, item.id, lines).await?;
    txn.commit().await?;

    info!("Stock item created successfully with ID: {}", item.id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            StockItemResponse::new(StockRecord::from((item, expenses)), &lookups),
            "Stock item created successfully",
        )),
    ))
}

/// List stock items
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    tag = "stock",
    params(StockQuery),
    responses(
        (status = 200, description = "Stock items retrieved successfully", body = ApiResponse<Vec<StockItemResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stock_items(
    Valid(Query(query)): Valid<Query<StockQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<StockItemResponse>>>> {
    trace!("Entering get_stock_items function");

    let city = match resolve_city_filter(&state.db, query.city.as_deref()).await? {
        CityFilter::All => None,
        CityFilter::Only { id, .. } => Some(id),
        CityFilter::Unknown(_) => {
            return Ok(Json(ApiResponse::ok(
                Vec::new(),
                "Stock items retrieved successfully",
            )));
        }
    };
    let filter = StockFilter {
        city,
        investor_id: query.investor_id,
        sold: query.sold,
    };

    let records = load_stock(&state.db, &filter).await?;
    let lookups = Lookups::load(&state.db).await?;
    debug!("Retrieved {} stock items", records.len());

    Ok(Json(ApiResponse::ok(
        records
            .into_iter()
            .map(|r| StockItemResponse::new(r, &lookups))
            .collect(),
        "Stock items retrieved successfully",
    )))
}

/// Get a stock item by ID
#[utoipa::path(
    get,
    path = "/api/v1/stock/{stock_item_id}",
    tag = "stock",
    params(
        ("stock_item_id" = i32, Path, description = "Stock item ID"),
    ),
    responses(
        (status = 200, description = "Stock item retrieved successfully", body = ApiResponse<StockItemResponse>),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stock_item(
    Path(stock_item_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<StockItemResponse>>> {
    let item = stock_item::Entity::find_by_id(stock_item_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", stock_item_id))?;
    let expenses = item.find_related(stock_expense::Entity).all(&state.db).await?;
    let lookups = Lookups::load(&state.db).await?;

    Ok(Json(ApiResponse::ok(
        StockItemResponse::new(StockRecord::from((item, expenses)), &lookups),
        "Stock item retrieved successfully",
    )))
}

/// Update a stock item
#[utoipa::path(
    put,
    path = "/api/v1/stock/{stock_item_id}",
    tag = "stock",
    params(
        ("stock_item_id" = i32, Path, description = "Stock item ID"),
    ),
    request_body = UpdateStockItemRequest,
    responses(
        (status = 200, description = "Stock item updated successfully", body = ApiResponse<StockItemResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_stock_item(
    Path(stock_item_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateStockItemRequest>>,
) -> ApiResult<Json<ApiResponse<StockItemResponse>>> {
    trace!("Entering update_stock_item function for stock_item_id: {}", stock_item_id);

    let existing = stock_item::Entity::find_by_id(stock_item_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", stock_item_id))?;

    if let Some(city_id) = request.city_id {
        ensure_exists::<city::Entity>(&state.db, city_id, "City").await?;
    }
    ensure_optional_exists::<investor::Entity>(&state.db, request.investor_id, "Investor").await?;
    let lines = request.expenses.as_deref().map(filled_lines);
    if let Some(lines) = &lines {
        ensure_expense_types(&state.db, lines).await?;
    }

    let txn = state.db.begin().await?;
    let mut active: stock_item::ActiveModel = existing.into();
    if let Some(product_name) = &request.product_name {
        active.product_name = Set(product_name.trim().to_string());
    }
    if request.reference.is_some() {
        active.reference = Set(clean_text(request.reference.as_deref()));
    }
    if let Some(buy_price) = request.buy_price {
        active.buy_price = Set(buy_price);
    }
    if let Some(expected_sell_price) = request.expected_sell_price {
        active.expected_sell_price = Set(expected_sell_price);
    }
    if let Some(quantity) = request.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(city_id) = request.city_id {
        active.city_id = Set(city_id);
    }
    if let Some(investor_id) = request.investor_id {
        active.investor_id = Set(Some(investor_id));
    }
    if request.photo.is_some() {
        active.photo = Set(clean_text(request.photo.as_deref()));
    }
    if let Some(sold) = request.sold {
        active.sold = Set(sold);
    }
    let item = active.update(&txn).await?;

    let expenses = match lines {
        Some(lines) => {
            stock_expense::Entity::delete_many()
                .filter(stock_expense::Column::StockItemId.eq(stock_item_id))
                .exec(&txn)
                .await?;
            insert_stock_expenses(&txn, stock_item_id, lines).await?
        }
        None => item.find_related(stock_expense::Entity).all(&txn).await?,
    };
    txn.commit().await?;

    info!("Stock item {} updated", stock_item_id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    Ok(Json(ApiResponse::ok(
        StockItemResponse::new(StockRecord::from((item, expenses)), &lookups),
        "Stock item updated successfully",
    )))
}

/// Delete a stock item together with its expenses
#[utoipa::path(
    delete,
    path = "/api/v1/stock/{stock_item_id}",
    tag = "stock",
    params(
        ("stock_item_id" = i32, Path, description = "Stock item ID"),
    ),
    responses(
        (status = 200, description = "Stock item deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_stock_item(
    Path(stock_item_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let txn = state.db.begin().await?;
    stock_expense::Entity::delete_many()
        .filter(stock_expense::Column::StockItemId.eq(stock_item_id))
        .exec(&txn)
        .await?;
    let result = stock_item::Entity::delete_by_id(stock_item_id)
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(ApiError::not_found("Stock item", stock_item_id));
    }
    txn.commit().await?;

    info!("Stock item with ID {} deleted successfully", stock_item_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("Stock item {} deleted", stock_item_id),
        "Stock item deleted successfully",
    )))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use common::{ApiResponse, ReportPeriod};
use compute::{money, period::resolve_period};
use model::entities::{city, expense_type, general_expense};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::handlers::clean_text;
use crate::helpers::lookups::{ensure_exists, ensure_optional_exists, resolve_city_filter, Lookups};
use crate::helpers::queries::load_general_expenses;
use crate::helpers::today;
use crate::helpers::validation::validate_amount;
use crate::schemas::{AppState, ErrorResponse, PeriodQuery};

/// Request body for creating or replacing a general expense
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct GeneralExpenseRequest {
    pub expense_type_id: i32,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    /// Booking date (YYYY-MM-DD). Today when creating, unchanged when updating.
    pub date: Option<NaiveDate>,
    /// City the expense belongs to; none for shared expenses
    pub city_id: Option<i32>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// General expense response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneralExpenseResponse {
    pub id: i32,
    pub expense_type_id: i32,
    pub expense_type: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub city_id: Option<i32>,
    pub city: Option<String>,
    pub description: Option<String>,
}

impl GeneralExpenseResponse {
    fn new(model: general_expense::Model, lookups: &Lookups) -> Self {
        Self {
            id: model.id,
            expense_type: lookups.expense_type(model.expense_type_id),
            expense_type_id: model.expense_type_id,
            amount: model.amount,
            date: model.date,
            city: model.city_id.map(|id| lookups.city(id)),
            city_id: model.city_id,
            description: model.description,
        }
    }
}

/// General expenses of one period
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneralExpenseList {
    pub period: ReportPeriod,
    /// City name or "all"
    pub city_filter: String,
    pub expenses: Vec<GeneralExpenseResponse>,
    pub total: Decimal,
}

async fn check_references(state: &AppState, request: &GeneralExpenseRequest) -> ApiResult<()> {
    ensure_exists::<expense_type::Entity>(&state.db, request.expense_type_id, "Expense type")
        .await?;
    ensure_optional_exists::<city::Entity>(&state.db, request.city_id, "City").await
}

/// Record a general expense
#[utoipa::path(
    post,
    path = "/api/v1/general-expenses",
    tag = "general-expenses",
    request_body = GeneralExpenseRequest,
    responses(
        (status = 201, description = "General expense created successfully", body = ApiResponse<GeneralExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_general_expense(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<GeneralExpenseRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<GeneralExpenseResponse>>)> {
    trace!("Entering create_general_expense function");
    check_references(&state, &request).await?;

    let model = general_expense::ActiveModel {
        expense_type_id: Set(request.expense_type_id),
        amount: Set(request.amount),
        date: Set(request.date.unwrap_or_else(today)),
        city_id: Set(request.city_id),
        description: Set(clean_text(request.description.as_deref())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("General expense created successfully with ID: {}", model.id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            GeneralExpenseResponse::new(model, &lookups),
            "General expense created successfully",
        )),
    ))
}

/// List general expenses of a period
#[utoipa::path(
    get,
    path = "/api/v1/general-expenses",
    tag = "general-expenses",
    params(PeriodQuery),
    responses(
        (status = 200, description = "General expenses retrieved successfully", body = ApiResponse<GeneralExpenseList>),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_general_expenses(
    Valid(Query(query)): Valid<Query<PeriodQuery>>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<GeneralExpenseList>>> {
    let period = resolve_period(&query.selection(), today())?;
    let city_filter = resolve_city_filter(&state.db, query.city.as_deref()).await?;

    let expenses =
        load_general_expenses(&state.db, Some((period.start, period.end)), &city_filter).await?;
    let total = money(expenses.iter().map(|e| e.amount).sum());
    debug!("Retrieved {} general expenses for {}", expenses.len(), period.label);

    let lookups = Lookups::load(&state.db).await?;
    let response = GeneralExpenseList {
        period,
        city_filter: city_filter.label(),
        expenses: expenses
            .into_iter()
            .map(|e| GeneralExpenseResponse::new(e, &lookups))
            .collect(),
        total,
    };

    Ok(Json(ApiResponse::ok(
        response,
        "General expenses retrieved successfully",
    )))
}

/// Get a general expense by ID
#[utoipa::path(
    get,
    path = "/api/v1/general-expenses/{expense_id}",
    tag = "general-expenses",
    params(
        ("expense_id" = i32, Path, description = "General expense ID"),
    ),
    responses(
        (status = 200, description = "General expense retrieved successfully", body = ApiResponse<GeneralExpenseResponse>),
        (status = 404, description = "General expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_general_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<GeneralExpenseResponse>>> {
    let model = general_expense::Entity::find_by_id(expense_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("General expense", expense_id))?;
    let lookups = Lookups::load(&state.db).await?;

    Ok(Json(ApiResponse::ok(
        GeneralExpenseResponse::new(model, &lookups),
        "General expense retrieved successfully",
    )))
}

/// Replace a general expense
#[utoipa::path(
    put,
    path = "/api/v1/general-expenses/{expense_id}",
    tag = "general-expenses",
    params(
        ("expense_id" = i32, Path, description = "General expense ID"),
    ),
    request_body = GeneralExpenseRequest,
    responses(
        (status = 200, description = "General expense updated successfully", body = ApiResponse<GeneralExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "General expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_general_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<GeneralExpenseRequest>>,
) -> ApiResult<Json<ApiResponse<GeneralExpenseResponse>>> {
    let existing = general_expense::Entity::find_by_id(expense_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("General expense", expense_id))?;
    check_references(&state, &request).await?;

    let date = request.date.unwrap_or(existing.date);
    let mut active: general_expense::ActiveModel = existing.into();
    active.expense_type_id = Set(request.expense_type_id);
    active.amount = Set(request.amount);
    active.date = Set(date);
    active.city_id = Set(request.city_id);
    active.description = Set(clean_text(request.description.as_deref()));
    let model = active.update(&state.db).await?;

    info!("General expense {} updated", expense_id);
    state.invalidate_reports();

    let lookups = Lookups::load(&state.db).await?;
    Ok(Json(ApiResponse::ok(
        GeneralExpenseResponse::new(model, &lookups),
        "General expense updated successfully",
    )))
}

/// Delete a general expense
#[utoipa::path(
    delete,
    path = "/api/v1/general-expenses/{expense_id}",
    tag = "general-expenses",
    params(
        ("expense_id" = i32, Path, description = "General expense ID"),
    ),
    responses(
        (status = 200, description = "General expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "General expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_general_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = general_expense::Entity::delete_by_id(expense_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("General expense", expense_id));
    }

    info!("General expense with ID {} deleted successfully", expense_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("General expense {} deleted", expense_id),
        "General expense deleted successfully",
    )))
}

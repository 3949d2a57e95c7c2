use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ApiResponse;
use model::entities::{expense, expense_type, general_expense, stock_expense};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::helpers::validation::validate_not_blank;
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating or renaming an expense type
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ExpenseTypeRequest {
    /// Expense type name, unique ("Delivery", "Rent")
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
}

/// Expense type response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseTypeResponse {
    pub id: i32,
    pub name: String,
}

impl From<expense_type::Model> for ExpenseTypeResponse {
    fn from(model: expense_type::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

async fn ensure_unique_name(state: &AppState, name: &str, except: Option<i32>) -> ApiResult<()> {
    let existing = expense_type::Entity::find()
        .filter(expense_type::Column::Name.eq(name))
        .one(&state.db)
        .await?;

    match existing {
        Some(found) if Some(found.id) != except => {
            warn!("Expense type name '{}' already used by {}", name, found.id);
            Err(ApiError::Conflict(format!("Expense type '{}' already exists", name)))
        }
        _ => Ok(()),
    }
}

/// Create a new expense type
#[utoipa::path(
    post,
    path = "/api/v1/expense-types",
    tag = "expense-types",
    request_body = ExpenseTypeRequest,
    responses(
        (status = 201, description = "Expense type created successfully", body = ApiResponse<ExpenseTypeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Expense type already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_expense_type(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ExpenseTypeRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ExpenseTypeResponse>>)> {
    trace!("Entering create_expense_type function");
    let name = request.name.trim().to_string();
    ensure_unique_name(&state, &name, None).await?;

    let model = expense_type::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Expense type created successfully with ID: {}, name: {}", model.id, model.name);
    state.invalidate_reports();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ExpenseTypeResponse::from(model),
            "Expense type created successfully",
        )),
    ))
}

/// Get all expense types, ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/expense-types",
    tag = "expense-types",
    responses(
        (status = 200, description = "Expense types retrieved successfully", body = ApiResponse<Vec<ExpenseTypeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense_types(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ExpenseTypeResponse>>>> {
    let types = expense_type::Entity::find()
        .order_by_asc(expense_type::Column::Name)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} expense types", types.len());

    Ok(Json(ApiResponse::ok(
        types.into_iter().map(ExpenseTypeResponse::from).collect(),
        "Expense types retrieved successfully",
    )))
}

/// Get an expense type by ID
#[utoipa::path(
    get,
    path = "/api/v1/expense-types/{expense_type_id}",
    tag = "expense-types",
    params(
        ("expense_type_id" = i32, Path, description = "Expense type ID"),
    ),
    responses(
        (status = 200, description = "Expense type retrieved successfully", body = ApiResponse<ExpenseTypeResponse>),
        (status = 404, description = "Expense type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense_type(
    Path(expense_type_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ExpenseTypeResponse>>> {
    let model = expense_type::Entity::find_by_id(expense_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense type", expense_type_id))?;

    Ok(Json(ApiResponse::ok(
        ExpenseTypeResponse::from(model),
        "Expense type retrieved successfully",
    )))
}

/// Rename an expense type
#[utoipa::path(
    put,
    path = "/api/v1/expense-types/{expense_type_id}",
    tag = "expense-types",
    params(
        ("expense_type_id" = i32, Path, description = "Expense type ID"),
    ),
    request_body = ExpenseTypeRequest,
    responses(
        (status = 200, description = "Expense type updated successfully", body = ApiResponse<ExpenseTypeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Expense type not found", body = ErrorResponse),
        (status = 409, description = "Expense type already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_expense_type(
    Path(expense_type_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ExpenseTypeRequest>>,
) -> ApiResult<Json<ApiResponse<ExpenseTypeResponse>>> {
    let existing = expense_type::Entity::find_by_id(expense_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense type", expense_type_id))?;

    let name = request.name.trim().to_string();
    ensure_unique_name(&state, &name, Some(expense_type_id)).await?;

    let mut active: expense_type::ActiveModel = existing.into();
    active.name = Set(name);
    let model = active.update(&state.db).await?;

    info!("Expense type {} renamed to {}", model.id, model.name);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        ExpenseTypeResponse::from(model),
        "Expense type updated successfully",
    )))
}

/// Delete an unused expense type
#[utoipa::path(
    delete,
    path = "/api/v1/expense-types/{expense_type_id}",
    tag = "expense-types",
    params(
        ("expense_type_id" = i32, Path, description = "Expense type ID"),
    ),
    responses(
        (status = 200, description = "Expense type deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Expense type not found", body = ErrorResponse),
        (status = 409, description = "Expense type is still used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_expense_type(
    Path(expense_type_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let uses = expense::Entity::find()
        .filter(expense::Column::ExpenseTypeId.eq(expense_type_id))
        .count(&state.db)
        .await?
        + stock_expense::Entity::find()
            .filter(stock_expense::Column::ExpenseTypeId.eq(expense_type_id))
            .count(&state.db)
            .await?
        + general_expense::Entity::find()
            .filter(general_expense::Column::ExpenseTypeId.eq(expense_type_id))
            .count(&state.db)
            .await?;
    if uses > 0 {
        return Err(ApiError::Conflict(format!(
            "Expense type {} is still used by {} expenses",
            expense_type_id, uses
        )));
    }

    let result = expense_type::Entity::delete_by_id(expense_type_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Expense type", expense_type_id));
    }

    info!("Expense type with ID {} deleted successfully", expense_type_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("Expense type {} deleted", expense_type_id),
        "Expense type deleted successfully",
    )))
}

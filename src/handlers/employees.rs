use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ApiResponse;
use model::entities::{employee, sale};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::helpers::validation::validate_not_blank;
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating or renaming an employee
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct EmployeeRequest {
    /// Employee name
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
}

/// Employee response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i32,
    pub name: String,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "employees",
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_employee(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<EmployeeRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EmployeeResponse>>)> {
    trace!("Entering create_employee function");

    let model = employee::ActiveModel {
        name: Set(request.name.trim().to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Employee created successfully with ID: {}", model.id);
    state.invalidate_reports();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            EmployeeResponse::from(model),
            "Employee created successfully",
        )),
    ))
}

/// Get all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "employees",
    responses(
        (status = 200, description = "Employees retrieved successfully", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    let employees = employee::Entity::find()
        .order_by_asc(employee::Column::Name)
        .order_by_asc(employee::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} employees", employees.len());

    Ok(Json(ApiResponse::ok(
        employees.into_iter().map(EmployeeResponse::from).collect(),
        "Employees retrieved successfully",
    )))
}

/// Get an employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    responses(
        (status = 200, description = "Employee retrieved successfully", body = ApiResponse<EmployeeResponse>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<EmployeeResponse>>> {
    let model = employee::Entity::find_by_id(employee_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", employee_id))?;

    Ok(Json(ApiResponse::ok(
        EmployeeResponse::from(model),
        "Employee retrieved successfully",
    )))
}

/// Rename an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee updated successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<EmployeeRequest>>,
) -> ApiResult<Json<ApiResponse<EmployeeResponse>>> {
    let existing = employee::Entity::find_by_id(employee_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", employee_id))?;

    let mut active: employee::ActiveModel = existing.into();
    active.name = Set(request.name.trim().to_string());
    let model = active.update(&state.db).await?;

    info!("Employee {} updated", model.id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        EmployeeResponse::from(model),
        "Employee updated successfully",
    )))
}

/// Delete an employee that has no sales
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    responses(
        (status = 200, description = "Employee deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 409, description = "Employee still has sales", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let sales = sale::Entity::find()
        .filter(sale::Column::EmployeeId.eq(employee_id))
        .count(&state.db)
        .await?;
    if sales > 0 {
        return Err(ApiError::Conflict(format!(
            "Employee {} is still used by {} sales",
            employee_id, sales
        )));
    }

    let result = employee::Entity::delete_by_id(employee_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Employee", employee_id));
    }

    info!("Employee with ID {} deleted successfully", employee_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("Employee {} deleted", employee_id),
        "Employee deleted successfully",
    )))
}

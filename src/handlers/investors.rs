use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ApiResponse;
use model::entities::investor;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::handlers::clean_text;
use crate::helpers::validation::validate_not_blank;
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating or updating an investor
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct InvestorRequest {
    /// Investor name
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Free-form note (terms, contact)
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Investor response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestorResponse {
    pub id: i32,
    pub name: String,
    pub comment: Option<String>,
}

impl From<investor::Model> for InvestorResponse {
    fn from(model: investor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            comment: model.comment,
        }
    }
}

/// Create a new investor
#[utoipa::path(
    post,
    path = "/api/v1/investors",
    tag = "investors",
    request_body = InvestorRequest,
    responses(
        (status = 201, description = "Investor created successfully", body = ApiResponse<InvestorResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_investor(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<InvestorRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InvestorResponse>>)> {
    trace!("Entering create_investor function");

    let model = investor::ActiveModel {
        name: Set(request.name.trim().to_string()),
        comment: Set(clean_text(request.comment.as_deref())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Investor created successfully with ID: {}", model.id);
    state.invalidate_reports();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            InvestorResponse::from(model),
            "Investor created successfully",
        )),
    ))
}

/// Get all investors, ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/investors",
    tag = "investors",
    responses(
        (status = 200, description = "Investors retrieved successfully", body = ApiResponse<Vec<InvestorResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_investors(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<InvestorResponse>>>> {
    let investors = investor::Entity::find()
        .order_by_asc(investor::Column::Name)
        .order_by_asc(investor::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} investors", investors.len());

    Ok(Json(ApiResponse::ok(
        investors.into_iter().map(InvestorResponse::from).collect(),
        "Investors retrieved successfully",
    )))
}

/// Get an investor by ID
#[utoipa::path(
    get,
    path = "/api/v1/investors/{investor_id}",
    tag = "investors",
    params(
        ("investor_id" = i32, Path, description = "Investor ID"),
    ),
    responses(
        (status = 200, description = "Investor retrieved successfully", body = ApiResponse<InvestorResponse>),
        (status = 404, description = "Investor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_investor(
    Path(investor_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<InvestorResponse>>> {
    let model = investor::Entity::find_by_id(investor_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Investor", investor_id))?;

    Ok(Json(ApiResponse::ok(
        InvestorResponse::from(model),
        "Investor retrieved successfully",
    )))
}

/// Update an investor
#[utoipa::path(
    put,
    path = "/api/v1/investors/{investor_id}",
    tag = "investors",
    params(
        ("investor_id" = i32, Path, description = "Investor ID"),
    ),
    request_body = InvestorRequest,
    responses(
        (status = 200, description = "Investor updated successfully", body = ApiResponse<InvestorResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Investor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_investor(
    Path(investor_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<InvestorRequest>>,
) -> ApiResult<Json<ApiResponse<InvestorResponse>>> {
    let existing = investor::Entity::find_by_id(investor_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Investor", investor_id))?;

    let mut active: investor::ActiveModel = existing.into();
    active.name = Set(request.name.trim().to_string());
    active.comment = Set(clean_text(request.comment.as_deref()));
    let model = active.update(&state.db).await?;

    info!("Investor {} updated", model.id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        InvestorResponse::from(model),
        "Investor updated successfully",
    )))
}

/// Delete an investor
///
/// Sales and stock items funded by the investor stay, without an investor.
#[utoipa::path(
    delete,
    path = "/api/v1/investors/{investor_id}",
    tag = "investors",
    params(
        ("investor_id" = i32, Path, description = "Investor ID"),
    ),
    responses(
        (status = 200, description = "Investor deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Investor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_investor(
    Path(investor_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = investor::Entity::delete_by_id(investor_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Investor", investor_id));
    }

    info!("Investor with ID {} deleted successfully", investor_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("Investor {} deleted", investor_id),
        "Investor deleted successfully",
    )))
}

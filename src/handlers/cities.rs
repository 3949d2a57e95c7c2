use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ApiResponse;
use model::entities::{city, sale, stock_item};
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

/// Request body for creating or renaming a city
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CityRequest {
    /// City name, unique
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
}

/// City response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    pub id: i32,
    pub name: String,
}

impl From<city::Model> for CityResponse {
    fn from(model: city::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

async fn ensure_unique_name(state: &AppState, name: &str, except: Option<i32>) -> ApiResult<()> {
    let existing = city::Entity::find()
        .filter(city::Column::Name.eq(name))
        .one(&state.db)
        .await?;

    match existing {
        Some(found) if Some(found.id) != except => {
            warn!("City name '{}' already used by city {}", name, found.id);
            Err(ApiError::Conflict(format!("City '{}' already exists", name)))
        }
        _ => Ok(()),
    }
}

/// Create a new city
#[utoipa::path(
    post,
    path = "/api/v1/cities",
    tag = "cities",
    request_body = CityRequest,
    responses(
        (status = 201, description = "City created successfully", body = ApiResponse<CityResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "City already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_city(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CityRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CityResponse>>)> {
    trace!("Entering create_city function");
    let name = request.name.trim().to_string();
    ensure_unique_name(&state, &name, None).await?;

    let model = city::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("City created successfully with ID: {}, name: {}", model.id, model.name);
    state.invalidate_reports();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            CityResponse::from(model),
            "City created successfully",
        )),
    ))
}

/// Get all cities, ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "cities",
    responses(
        (status = 200, description = "Cities retrieved successfully", body = ApiResponse<Vec<CityResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_cities(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<CityResponse>>>> {
    trace!("Entering get_cities function");

    let cities = city::Entity::find()
        .order_by_asc(city::Column::Name)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} cities", cities.len());

    Ok(Json(ApiResponse::ok(
        cities.into_iter().map(CityResponse::from).collect(),
        "Cities retrieved successfully",
    )))
}

/// Get a city by ID
#[utoipa::path(
    get,
    path = "/api/v1/cities/{city_id}",
    tag = "cities",
    params(
        ("city_id" = i32, Path, description = "City ID"),
    ),
    responses(
        (status = 200, description = "City retrieved successfully", body = ApiResponse<CityResponse>),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_city(
    Path(city_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<CityResponse>>> {
    trace!("Entering get_city function for city_id: {}", city_id);

    let model = city::Entity::find_by_id(city_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("City", city_id))?;

    Ok(Json(ApiResponse::ok(
        CityResponse::from(model),
        "City retrieved successfully",
    )))
}

/// Rename a city
#[utoipa::path(
    put,
    path = "/api/v1/cities/{city_id}",
    tag = "cities",
    params(
        ("city_id" = i32, Path, description = "City ID"),
    ),
    request_body = CityRequest,
    responses(
        (status = 200, description = "City updated successfully", body = ApiResponse<CityResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 409, description = "City already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_city(
    Path(city_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CityRequest>>,
) -> ApiResult<Json<ApiResponse<CityResponse>>> {
    trace!("Entering update_city function for city_id: {}", city_id);

    let existing = city::Entity::find_by_id(city_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("City", city_id))?;

    let name = request.name.trim().to_string();
    ensure_unique_name(&state, &name, Some(city_id)).await?;

    let mut active: city::ActiveModel = existing.into();
    active.name = Set(name);
    let model = active.update(&state.db).await?;

    info!("City {} renamed to {}", model.id, model.name);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        CityResponse::from(model),
        "City updated successfully",
    )))
}

/// Delete a city
///
/// Fails while sales or stock items still reference the city.
/// General expenses booked on it become shared expenses.
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{city_id}",
    tag = "cities",
    params(
        ("city_id" = i32, Path, description = "City ID"),
    ),
    responses(
        (status = 200, description = "City deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 409, description = "City is still referenced", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_city(
    Path(city_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_city function for city_id: {}", city_id);

    let sales = sale::Entity::find()
        .filter(sale::Column::CityId.eq(city_id))
        .count(&state.db)
        .await?;
    let stock = stock_item::Entity::find()
        .filter(stock_item::Column::CityId.eq(city_id))
        .count(&state.db)
        .await?;
    if sales > 0 || stock > 0 {
        return Err(ApiError::Conflict(format!(
            "City {} is still used by {} sales and {} stock items",
            city_id, sales, stock
        )));
    }

    let result = city::Entity::delete_by_id(city_id).exec(&state.db).await?;
    debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("City", city_id));
    }

    info!("City with ID {} deleted successfully", city_id);
    state.invalidate_reports();

    Ok(Json(ApiResponse::ok(
        format!("City {} deleted", city_id),
        "City deleted successfully",
    )))
}

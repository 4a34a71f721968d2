use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::manufacturing::CreateBatchRequest,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBatchBody {
    pub output_item_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BatchFilters {
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

pub fn manufacturing_routes() -> Router<AppState> {
    Router::new()
        .route("/manufacturing/batches", get(list_batches).post(create_batch))
        .route("/manufacturing/batches/{id}", get(get_batch))
        .route("/manufacturing/batches/{id}/start", post(start_batch))
        .route("/manufacturing/batches/{id}/complete", post(complete_batch))
}

pub async fn create_batch(
    State(state): State<AppState>,
    Json(body): Json<CreateBatchBody>,
) -> Result<Response, ServiceError> {
    let batch = state
        .services
        .manufacturing
        .create_batch(CreateBatchRequest {
            output_item_id: body.output_item_id,
            quantity: body.quantity,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(batch))
}

pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let batch = state
        .services
        .manufacturing
        .get_batch(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Production batch {} not found", id)))?;
    Ok(success_response(batch))
}

pub async fn list_batches(
    State(state): State<AppState>,
    Query(filters): Query<BatchFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (batches, total) = state
        .services
        .manufacturing
        .list_batches(filters.status, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(batches, &params, total))
}

pub async fn start_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let batch = state.services.manufacturing.start_batch(id).await?;
    Ok(success_response(batch))
}

/// Complete a batch, booking its output quantity into stock
#[utoipa::path(
    post,
    path = "/api/v1/manufacturing/batches/{id}/complete",
    params(("id" = Uuid, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Batch completed, stock incremented"),
        (status = 404, description = "Batch not found"),
        (status = 400, description = "Batch not in progress")
    ),
    tag = "manufacturing"
)]
pub async fn complete_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let batch = state.services.manufacturing.complete_batch(id).await?;
    Ok(success_response(batch))
}

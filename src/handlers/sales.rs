use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::sales::CreateSaleRequest,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SaleFilters {
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

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale))
        .route("/sales/{id}/complete", post(complete_sale))
        .route("/sales/{id}/cancel", post(cancel_sale))
}

/// Create a sale with its line items
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    responses(
        (status = 201, description = "Sale created with items"),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "A referenced item does not exist"),
        (status = 422, description = "Insufficient stock for a completed sale")
    ),
    tag = "sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<CreateSaleRequest>,
) -> Result<Response, ServiceError> {
    let sale = state.services.sales.create_sale_with_items(body).await?;
    Ok(created_response(sale))
}

/// Get a sale with its line items
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale returned"),
        (status = 404, description = "Sale not found")
    ),
    tag = "sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let sale = state
        .services
        .sales
        .get_sale_with_items(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Sale {} not found", id)))?;
    Ok(success_response(sale))
}

pub async fn list_sales(
    State(state): State<AppState>,
    Query(filters): Query<SaleFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (sales, total) = state
        .services
        .sales
        .list_sales(filters.status, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(sales, &params, total))
}

/// Complete a draft or pending sale
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/complete",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale completed, stock decremented"),
        (status = 404, description = "Sale not found"),
        (status = 422, description = "Insufficient stock")
    ),
    tag = "sales"
)]
pub async fn complete_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let sale = state.services.sales.complete_sale(id).await?;
    Ok(success_response(sale))
}

pub async fn cancel_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let sale = state.services.sales.cancel_sale(id).await?;
    Ok(success_response(sale))
}

use crate::{
    entities::inventory_transaction::MovementDirection,
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, paginated_response, success_response,
        PaginationParams,
    },
    handlers::AppState,
    services::inventory::{CreateItemRequest, MovementRequest, UpdateItemRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemBody {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemBody {
    pub name: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordMovementBody {
    pub direction: String,
    pub quantity: i32,
    pub reason: Option<String>,
    pub recorded_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub transaction: crate::entities::inventory_transaction::Model,
    pub item: crate::entities::inventory_item::Model,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TransactionFilters {
    pub item_id: Option<Uuid>,
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

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route("/inventory/low-stock", get(list_low_stock))
        .route("/inventory/transactions", get(list_transactions))
        .route(
            "/inventory/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/inventory/{id}/movements", post(record_movement))
}

/// List inventory items
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(PaginationParams),
    responses(
        (status = 200, description = "Inventory items returned")
    ),
    tag = "inventory"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list_items(params.page, params.per_page)
        .await?;
    Ok(paginated_response(items, &params, total))
}

/// Create an inventory item
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateItemBody,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Invalid input")
    ),
    tag = "inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<CreateItemBody>,
) -> Result<Response, ServiceError> {
    let item = state
        .services
        .inventory
        .create_item(CreateItemRequest {
            sku: body.sku,
            name: body.name,
            quantity: body.quantity,
            min_stock: body.min_stock,
            max_stock: body.max_stock,
            unit_price: body.unit_price,
        })
        .await?;
    Ok(created_response(item))
}

/// Get one inventory item
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item returned"),
        (status = 404, description = "Item not found")
    ),
    tag = "inventory"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let item = state
        .services
        .inventory
        .get_item(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;
    Ok(success_response(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Response, ServiceError> {
    let item = state
        .services
        .inventory
        .update_item(
            id,
            UpdateItemRequest {
                name: body.name,
                min_stock: body.min_stock,
                max_stock: body.max_stock.map(Some),
                unit_price: body.unit_price,
            },
        )
        .await?;
    Ok(success_response(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    state.services.inventory.delete_item(id).await?;
    Ok(no_content_response())
}

pub async fn list_low_stock(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let items = state.services.inventory.list_low_stock().await?;
    Ok(success_response(items))
}

/// Record a stock movement against an item
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/movements",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = RecordMovementBody,
    responses(
        (status = 201, description = "Movement recorded"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Insufficient stock")
    ),
    tag = "inventory"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordMovementBody>,
) -> Result<Response, ServiceError> {
    let direction = MovementDirection::from_str(&body.direction).ok_or_else(|| {
        ServiceError::InvalidInput(format!("unknown movement direction '{}'", body.direction))
    })?;

    let mut request = MovementRequest::new(id, direction, body.quantity);
    request.reason = body.reason;
    request.recorded_by = body.recorded_by;

    let outcome = state.services.inventory.record_movement(request).await?;
    Ok(created_response(MovementResponse {
        transaction: outcome.transaction,
        item: outcome.item,
    }))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filters): Query<TransactionFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (transactions, total) = state
        .services
        .inventory
        .list_transactions(filters.item_id, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(transactions, &params, total))
}

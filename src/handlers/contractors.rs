use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::contractors::{CreateContractorRequest, UpdateContractorRequest},
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
pub struct CreateContractorBody {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContractorBody {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ContractorFilters {
    #[serde(default)]
    pub active_only: bool,
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

pub fn contractors_routes() -> Router<AppState> {
    Router::new()
        .route("/contractors", get(list_contractors).post(create_contractor))
        .route("/contractors/{id}", get(get_contractor).put(update_contractor))
        .route("/contractors/{id}/deactivate", post(deactivate_contractor))
}

pub async fn list_contractors(
    State(state): State<AppState>,
    Query(filters): Query<ContractorFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (contractors, total) = state
        .services
        .contractors
        .list_contractors(filters.active_only, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(contractors, &params, total))
}

pub async fn create_contractor(
    State(state): State<AppState>,
    Json(body): Json<CreateContractorBody>,
) -> Result<Response, ServiceError> {
    let contractor = state
        .services
        .contractors
        .create_contractor(CreateContractorRequest {
            name: body.name,
            phone: body.phone,
            address: body.address,
        })
        .await?;
    Ok(created_response(contractor))
}

pub async fn get_contractor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let contractor = state
        .services
        .contractors
        .get_contractor(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Contractor {} not found", id)))?;
    Ok(success_response(contractor))
}

pub async fn update_contractor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateContractorBody>,
) -> Result<Response, ServiceError> {
    let contractor = state
        .services
        .contractors
        .update_contractor(
            id,
            UpdateContractorRequest {
                name: body.name,
                phone: body.phone.map(Some),
                address: body.address.map(Some),
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(success_response(contractor))
}

pub async fn deactivate_contractor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let contractor = state.services.contractors.deactivate_contractor(id).await?;
    Ok(success_response(contractor))
}

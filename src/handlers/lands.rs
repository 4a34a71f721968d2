use crate::{
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, paginated_response, success_response,
        PaginationParams,
    },
    handlers::AppState,
    services::lands::{CreateLandRequest, UpdateLandRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLandBody {
    pub name: String,
    pub location: Option<String>,
    pub area_hectares: Decimal,
    pub crop: Option<String>,
    pub contractor_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLandBody {
    pub name: Option<String>,
    pub location: Option<String>,
    pub area_hectares: Option<Decimal>,
    pub crop: Option<String>,
    pub contractor_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub fn lands_routes() -> Router<AppState> {
    Router::new()
        .route("/lands", get(list_lands).post(create_land))
        .route(
            "/lands/{id}",
            get(get_land).put(update_land).delete(delete_land),
        )
}

pub async fn list_lands(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (lands, total) = state
        .services
        .lands
        .list_lands(params.page, params.per_page)
        .await?;
    Ok(paginated_response(lands, &params, total))
}

pub async fn create_land(
    State(state): State<AppState>,
    Json(body): Json<CreateLandBody>,
) -> Result<Response, ServiceError> {
    let land = state
        .services
        .lands
        .create_land(CreateLandRequest {
            name: body.name,
            location: body.location,
            area_hectares: body.area_hectares,
            crop: body.crop,
            contractor_id: body.contractor_id,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(land))
}

pub async fn get_land(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let land = state
        .services
        .lands
        .get_land(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Land {} not found", id)))?;
    Ok(success_response(land))
}

pub async fn update_land(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLandBody>,
) -> Result<Response, ServiceError> {
    let land = state
        .services
        .lands
        .update_land(
            id,
            UpdateLandRequest {
                name: body.name,
                location: body.location.map(Some),
                area_hectares: body.area_hectares,
                crop: body.crop.map(Some),
                contractor_id: body.contractor_id.map(Some),
                notes: body.notes.map(Some),
            },
        )
        .await?;
    Ok(success_response(land))
}

pub async fn delete_land(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    state.services.lands.delete_land(id).await?;
    Ok(no_content_response())
}

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::cutting::{CreateCuttingJobRequest, RecordCuttingPaymentRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCuttingJobBody {
    pub land_id: Uuid,
    pub contractor_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinishJobBody {
    pub quantity_tonnes: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordCuttingPaymentBody {
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CuttingJobFilters {
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CuttingPaymentFilters {
    pub contractor_id: Option<Uuid>,
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

pub fn cutting_routes() -> Router<AppState> {
    Router::new()
        .route("/cutting/jobs", get(list_jobs).post(create_job))
        .route("/cutting/jobs/{id}", get(get_job))
        .route("/cutting/jobs/{id}/finish", post(finish_job))
        .route("/cutting/jobs/{id}/payments", post(record_payment))
        .route("/cutting/payments", get(list_payments))
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(body): Json<CreateCuttingJobBody>,
) -> Result<Response, ServiceError> {
    let job = state
        .services
        .cutting
        .create_job(CreateCuttingJobRequest {
            land_id: body.land_id,
            contractor_id: body.contractor_id,
            scheduled_date: body.scheduled_date,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(job))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let job = state
        .services
        .cutting
        .get_job(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Cutting job {} not found", id)))?;
    Ok(success_response(job))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<CuttingJobFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (jobs, total) = state
        .services
        .cutting
        .list_jobs(filters.status, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(jobs, &params, total))
}

pub async fn finish_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FinishJobBody>,
) -> Result<Response, ServiceError> {
    let job = state
        .services
        .cutting
        .finish_job(id, body.quantity_tonnes)
        .await?;
    Ok(success_response(job))
}

/// Pay a contractor for a finished cutting job
#[utoipa::path(
    post,
    path = "/api/v1/cutting/jobs/{id}/payments",
    params(("id" = Uuid, Path, description = "Cutting job id")),
    request_body = RecordCuttingPaymentBody,
    responses(
        (status = 201, description = "Payment recorded with receipt number"),
        (status = 404, description = "Job not found"),
        (status = 400, description = "Job not in a payable state")
    ),
    tag = "cutting"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordCuttingPaymentBody>,
) -> Result<Response, ServiceError> {
    let payment = state
        .services
        .cutting
        .record_payment(RecordCuttingPaymentRequest {
            cutting_job_id: id,
            amount: body.amount,
            paid_at: body.paid_at,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(payment))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(filters): Query<CuttingPaymentFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (payments, total) = state
        .services
        .cutting
        .list_payments(filters.contractor_id, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(payments, &params, total))
}

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::payroll::{CreateEmployeeRequest, RecordAdvanceRequest, UpdateEmployeeRequest},
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
pub struct CreateEmployeeBody {
    pub name: String,
    pub role: Option<String>,
    pub daily_wage: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeBody {
    pub name: Option<String>,
    pub role: Option<String>,
    pub daily_wage: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordAdvanceBody {
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub recorded_by: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct EmployeeFilters {
    #[serde(default)]
    pub active_only: bool,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AdvanceFilters {
    pub employee_id: Option<Uuid>,
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

pub fn payroll_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/{id}", get(get_employee).put(update_employee))
        .route("/employees/{id}/advances", post(record_advance))
        .route("/advances", get(list_advances))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(filters): Query<EmployeeFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (employees, total) = state
        .services
        .payroll
        .list_employees(filters.active_only, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(employees, &params, total))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeBody>,
) -> Result<Response, ServiceError> {
    let employee = state
        .services
        .payroll
        .create_employee(CreateEmployeeRequest {
            name: body.name,
            role: body.role,
            daily_wage: body.daily_wage,
        })
        .await?;
    Ok(created_response(employee))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let employee = state
        .services
        .payroll
        .get_employee(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))?;
    Ok(success_response(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeBody>,
) -> Result<Response, ServiceError> {
    let employee = state
        .services
        .payroll
        .update_employee(
            id,
            UpdateEmployeeRequest {
                name: body.name,
                role: body.role.map(Some),
                daily_wage: body.daily_wage,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(success_response(employee))
}

/// Record a wage advance against an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees/{id}/advances",
    params(("id" = Uuid, Path, description = "Employee id")),
    request_body = RecordAdvanceBody,
    responses(
        (status = 201, description = "Advance recorded with receipt number"),
        (status = 404, description = "Employee not found"),
        (status = 400, description = "Invalid amount")
    ),
    tag = "payroll"
)]
pub async fn record_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordAdvanceBody>,
) -> Result<Response, ServiceError> {
    let advance = state
        .services
        .payroll
        .record_advance(RecordAdvanceRequest {
            employee_id: id,
            amount: body.amount,
            paid_at: body.paid_at,
            notes: body.notes,
            recorded_by: body.recorded_by,
        })
        .await?;
    Ok(created_response(advance))
}

pub async fn list_advances(
    State(state): State<AppState>,
    Query(filters): Query<AdvanceFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (advances, total) = state
        .services
        .payroll
        .list_advances(filters.employee_id, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(advances, &params, total))
}

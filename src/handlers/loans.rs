use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::loans::{IssueLoanRequest, RecordLoanPaymentRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueLoanBody {
    pub employee_id: Uuid,
    pub principal: Decimal,
    pub issued_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordLoanPaymentBody {
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LoanFilters {
    pub employee_id: Option<Uuid>,
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

pub fn loans_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans).post(issue_loan))
        .route("/loans/{id}", get(get_loan))
        .route("/loans/{id}/payments", get(list_payments).post(record_payment))
}

pub async fn issue_loan(
    State(state): State<AppState>,
    Json(body): Json<IssueLoanBody>,
) -> Result<Response, ServiceError> {
    let loan = state
        .services
        .loans
        .issue_loan(IssueLoanRequest {
            employee_id: body.employee_id,
            principal: body.principal,
            issued_at: body.issued_at,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(loan))
}

pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let loan = state
        .services
        .loans
        .get_loan(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Loan {} not found", id)))?;
    Ok(success_response(loan))
}

pub async fn list_loans(
    State(state): State<AppState>,
    Query(filters): Query<LoanFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (loans, total) = state
        .services
        .loans
        .list_loans(
            filters.employee_id,
            filters.status,
            filters.page,
            filters.per_page,
        )
        .await?;
    Ok(paginated_response(loans, &params, total))
}

/// Record a repayment against a loan
#[utoipa::path(
    post,
    path = "/api/v1/loans/{id}/payments",
    params(("id" = Uuid, Path, description = "Loan id")),
    request_body = RecordLoanPaymentBody,
    responses(
        (status = 201, description = "Payment recorded, balance decremented"),
        (status = 404, description = "Loan not found"),
        (status = 400, description = "Loan inactive or amount exceeds balance")
    ),
    tag = "loans"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordLoanPaymentBody>,
) -> Result<Response, ServiceError> {
    let outcome = state
        .services
        .loans
        .record_payment(RecordLoanPaymentRequest {
            loan_id: id,
            amount: body.amount,
            paid_at: body.paid_at,
            notes: body.notes,
        })
        .await?;
    Ok(created_response(serde_json::json!({
        "payment": outcome.payment,
        "loan": outcome.loan,
    })))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let payments = state.services.loans.list_payments(id).await?;
    Ok(success_response(payments))
}

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, paginated_response, success_response, PaginationParams},
    handlers::AppState,
    services::accounting::PostEntryRequest,
};
use axum::{
    extract::{Json, Query, State},
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
pub struct PostEntryBody {
    pub debit_account: String,
    pub credit_account: String,
    pub amount: Decimal,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub description: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LedgerFilters {
    pub account: Option<String>,
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

pub fn accounting_routes() -> Router<AppState> {
    Router::new()
        .route("/ledger/entries", get(list_entries).post(post_entry))
        .route("/ledger/trial-balance", get(trial_balance))
}

/// Post a balanced debit/credit pair to the ledger
#[utoipa::path(
    post,
    path = "/api/v1/ledger/entries",
    request_body = PostEntryBody,
    responses(
        (status = 201, description = "Entry pair posted"),
        (status = 400, description = "Unbalanced or invalid posting")
    ),
    tag = "accounting"
)]
pub async fn post_entry(
    State(state): State<AppState>,
    Json(body): Json<PostEntryBody>,
) -> Result<Response, ServiceError> {
    let posted = state
        .services
        .accounting
        .post_entry(PostEntryRequest {
            debit_account: body.debit_account,
            credit_account: body.credit_account,
            amount: body.amount,
            reference_type: body.reference_type,
            reference_id: body.reference_id,
            description: body.description,
            occurred_at: body.occurred_at,
        })
        .await?;
    Ok(created_response(posted))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(filters): Query<LedgerFilters>,
) -> Result<Response, ServiceError> {
    let params = PaginationParams {
        page: filters.page,
        per_page: filters.per_page,
    };
    let (entries, total) = state
        .services
        .accounting
        .list_entries(filters.account, filters.page, filters.per_page)
        .await?;
    Ok(paginated_response(entries, &params, total))
}

pub async fn trial_balance(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let rows = state.services.accounting.trial_balance().await?;
    Ok(success_response(rows))
}

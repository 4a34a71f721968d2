use crate::{
    db::DbPool,
    entities::{
        contractor::Entity as Contractor,
        cutting_job::{self, CuttingJobStatus, Entity as CuttingJob},
        cutting_payment::{self, Entity as CuttingPayment},
        land::Entity as Land,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::sequence::{self, PREFIX_CUTTING},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCuttingJobRequest {
    pub land_id: Uuid,
    pub contractor_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordCuttingPaymentRequest {
    pub cutting_job_id: Uuid,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Cutting jobs on estate lands and the contractor payments against them.
#[derive(Clone)]
pub struct CuttingService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl CuttingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn create_job(
        &self,
        request: CreateCuttingJobRequest,
    ) -> Result<cutting_job::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        Land::find_by_id(request.land_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Land {} not found", request.land_id)))?;
        Contractor::find_by_id(request.contractor_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Contractor {} not found", request.contractor_id))
            })?;

        let job = cutting_job::ActiveModel {
            id: Set(Uuid::new_v4()),
            land_id: Set(request.land_id),
            contractor_id: Set(request.contractor_id),
            scheduled_date: Set(request.scheduled_date),
            status: Set(CuttingJobStatus::Scheduled.as_str().to_string()),
            quantity_tonnes: Set(None),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(job_id = %job.id, "cutting job created");
        Ok(job)
    }

    pub async fn get_job(&self, id: Uuid) -> Result<Option<cutting_job::Model>, ServiceError> {
        Ok(CuttingJob::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    pub async fn list_jobs(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<cutting_job::Model>, u64), ServiceError> {
        let mut query = CuttingJob::find().order_by_desc(cutting_job::Column::ScheduledDate);
        if let Some(status) = status {
            query = query.filter(cutting_job::Column::Status.eq(status));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let jobs = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((jobs, total))
    }

    /// Marks a job done and records the harvested tonnage.
    pub async fn finish_job(
        &self,
        id: Uuid,
        quantity_tonnes: Decimal,
    ) -> Result<cutting_job::Model, ServiceError> {
        if quantity_tonnes <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "harvested quantity must be positive".to_string(),
            ));
        }

        let job = CuttingJob::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cutting job {} not found", id)))?;

        match CuttingJobStatus::from_str(&job.status) {
            Some(CuttingJobStatus::Scheduled) | Some(CuttingJobStatus::InProgress) => {}
            _ => {
                return Err(ServiceError::InvalidOperation(format!(
                    "cutting job {} cannot be finished from status '{}'",
                    id, job.status
                )))
            }
        }

        let mut active: cutting_job::ActiveModel = job.into();
        active.status = Set(CuttingJobStatus::Done.as_str().to_string());
        active.quantity_tonnes = Set(Some(quantity_tonnes));
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Pays a contractor for a finished job: draws the `CUT` receipt number,
    /// inserts the payment, and flips the job to paid in one transaction, so
    /// a payment row can never exist against a job still marked unpaid.
    #[instrument(skip(self, request), fields(cutting_job_id = %request.cutting_job_id))]
    pub async fn record_payment(
        &self,
        request: RecordCuttingPaymentRequest,
    ) -> Result<cutting_payment::Model, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "payment amount must be positive".to_string(),
            ));
        }

        let req = request.clone();
        let payment = self
            .db_pool
            .transaction::<_, cutting_payment::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let job = CuttingJob::find_by_id(req.cutting_job_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Cutting job {} not found",
                                req.cutting_job_id
                            ))
                        })?;

                    if CuttingJobStatus::from_str(&job.status) != Some(CuttingJobStatus::Done) {
                        return Err(ServiceError::InvalidOperation(format!(
                            "cutting job {} must be done before payment (status '{}')",
                            job.id, job.status
                        )));
                    }

                    let now = Utc::now();
                    let receipt_number =
                        sequence::next_receipt_number(txn, PREFIX_CUTTING, now).await?;

                    let payment = cutting_payment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        receipt_number: Set(receipt_number),
                        cutting_job_id: Set(job.id),
                        contractor_id: Set(job.contractor_id),
                        amount: Set(req.amount),
                        paid_at: Set(req.paid_at.unwrap_or(now)),
                        notes: Set(req.notes),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let mut active: cutting_job::ActiveModel = job.into();
                    active.status = Set(CuttingJobStatus::Paid.as_str().to_string());
                    active.update(txn).await?;

                    Ok(payment)
                })
            })
            .await?;

        info!(receipt_number = %payment.receipt_number, "cutting payment recorded");

        let event = Event::CuttingPaymentRecorded {
            cutting_job_id: payment.cutting_job_id,
            receipt_number: payment.receipt_number.clone(),
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send cutting payment event");
        }

        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        contractor_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<cutting_payment::Model>, u64), ServiceError> {
        let mut query = CuttingPayment::find().order_by_desc(cutting_payment::Column::PaidAt);
        if let Some(contractor_id) = contractor_id {
            query = query.filter(cutting_payment::Column::ContractorId.eq(contractor_id));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let payments = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((payments, total))
    }
}

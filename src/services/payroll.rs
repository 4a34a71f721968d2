use crate::{
    db::DbPool,
    entities::{
        advance_payment::{self, Entity as AdvancePayment},
        employee::{self, Entity as Employee},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::sequence::{self, PREFIX_ADVANCE},
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
pub struct CreateEmployeeRequest {
    pub name: String,
    pub role: Option<String>,
    pub daily_wage: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub role: Option<Option<String>>,
    pub daily_wage: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RecordAdvanceRequest {
    pub employee_id: Uuid,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub recorded_by: Option<String>,
}

/// Employee records and wage advances.
#[derive(Clone)]
pub struct PayrollService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl PayrollService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> Result<employee::Model, ServiceError> {
        if request.daily_wage < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "daily wage cannot be negative".to_string(),
            ));
        }

        let employee = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            role: Set(request.role),
            daily_wage: Set(request.daily_wage),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Option<employee::Model>, ServiceError> {
        Ok(Employee::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    pub async fn list_employees(
        &self,
        active_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<employee::Model>, u64), ServiceError> {
        let mut query = Employee::find().order_by_asc(employee::Column::Name);
        if active_only {
            query = query.filter(employee::Column::IsActive.eq(true));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let employees = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((employees, total))
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        request: UpdateEmployeeRequest,
    ) -> Result<employee::Model, ServiceError> {
        let employee = Employee::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))?;

        let mut active: employee::ActiveModel = employee.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(role) = request.role {
            active.role = Set(role);
        }
        if let Some(daily_wage) = request.daily_wage {
            if daily_wage < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "daily wage cannot be negative".to_string(),
                ));
            }
            active.daily_wage = Set(daily_wage);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Records a wage advance: the `ADV` receipt number is drawn from the
    /// period counter and the payment row inserted in one transaction, so a
    /// consumed number always has its payment and vice versa.
    #[instrument(skip(self, request), fields(employee_id = %request.employee_id))]
    pub async fn record_advance(
        &self,
        request: RecordAdvanceRequest,
    ) -> Result<advance_payment::Model, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "advance amount must be positive".to_string(),
            ));
        }

        let req = request.clone();
        let payment = self
            .db_pool
            .transaction::<_, advance_payment::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let employee = Employee::find_by_id(req.employee_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Employee {} not found",
                                req.employee_id
                            ))
                        })?;

                    let now = Utc::now();
                    let receipt_number =
                        sequence::next_receipt_number(txn, PREFIX_ADVANCE, now).await?;

                    let payment = advance_payment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        receipt_number: Set(receipt_number),
                        employee_id: Set(employee.id),
                        amount: Set(req.amount),
                        paid_at: Set(req.paid_at.unwrap_or(now)),
                        notes: Set(req.notes),
                        recorded_by: Set(req.recorded_by),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    Ok(payment)
                })
            })
            .await?;

        info!(receipt_number = %payment.receipt_number, "advance recorded");

        let event = Event::AdvanceRecorded {
            employee_id: payment.employee_id,
            receipt_number: payment.receipt_number.clone(),
            amount: payment.amount,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send advance event");
        }

        Ok(payment)
    }

    pub async fn list_advances(
        &self,
        employee_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<advance_payment::Model>, u64), ServiceError> {
        let mut query =
            AdvancePayment::find().order_by_desc(advance_payment::Column::PaidAt);
        if let Some(employee_id) = employee_id {
            query = query.filter(advance_payment::Column::EmployeeId.eq(employee_id));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let advances = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((advances, total))
    }
}

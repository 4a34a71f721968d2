use crate::{
    db::DbPool,
    entities::{
        employee::Entity as Employee,
        loan::{self, Entity as Loan, LoanStatus},
        loan_payment::{self, Entity as LoanPayment},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::sequence::{self, PREFIX_LOAN},
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
pub struct IssueLoanRequest {
    pub employee_id: Uuid,
    pub principal: Decimal,
    pub issued_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordLoanPaymentRequest {
    pub loan_id: Uuid,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A recorded repayment together with the loan as it looks afterwards.
#[derive(Debug, Clone)]
pub struct LoanPaymentOutcome {
    pub payment: loan_payment::Model,
    pub loan: loan::Model,
}

/// Employee loans and repayments. The repayment write is grouped: payment
/// row insert and balance decrement commit together or not at all.
#[derive(Clone)]
pub struct LoanService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl LoanService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(employee_id = %request.employee_id))]
    pub async fn issue_loan(&self, request: IssueLoanRequest) -> Result<loan::Model, ServiceError> {
        if request.principal <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "loan principal must be positive".to_string(),
            ));
        }

        let req = request.clone();
        let loan = self
            .db_pool
            .transaction::<_, loan::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    Employee::find_by_id(req.employee_id)
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
                        sequence::next_receipt_number(txn, PREFIX_LOAN, now).await?;

                    let loan = loan::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        receipt_number: Set(receipt_number),
                        employee_id: Set(req.employee_id),
                        principal: Set(req.principal),
                        balance: Set(req.principal),
                        status: Set(LoanStatus::Active.as_str().to_string()),
                        issued_at: Set(req.issued_at.unwrap_or(now)),
                        notes: Set(req.notes),
                        created_at: Set(now),
                        updated_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    Ok(loan)
                })
            })
            .await?;

        info!(receipt_number = %loan.receipt_number, "loan issued");

        let event = Event::LoanIssued {
            loan_id: loan.id,
            receipt_number: loan.receipt_number.clone(),
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send loan issued event");
        }

        Ok(loan)
    }

    pub async fn get_loan(&self, id: Uuid) -> Result<Option<loan::Model>, ServiceError> {
        Ok(Loan::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    pub async fn list_loans(
        &self,
        employee_id: Option<Uuid>,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<loan::Model>, u64), ServiceError> {
        let mut query = Loan::find().order_by_desc(loan::Column::IssuedAt);
        if let Some(employee_id) = employee_id {
            query = query.filter(loan::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = status {
            query = query.filter(loan::Column::Status.eq(status));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let loans = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((loans, total))
    }

    /// Records a repayment: inserts the payment row and decrements the
    /// loan's balance in one transaction, flipping the status to repaid when
    /// the balance reaches zero. A payment can never exist without its
    /// balance change, and overpayment is rejected before any write.
    #[instrument(skip(self, request), fields(loan_id = %request.loan_id))]
    pub async fn record_payment(
        &self,
        request: RecordLoanPaymentRequest,
    ) -> Result<LoanPaymentOutcome, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "payment amount must be positive".to_string(),
            ));
        }

        let req = request.clone();
        let outcome = self
            .db_pool
            .transaction::<_, LoanPaymentOutcome, ServiceError>(move |txn| {
                Box::pin(async move {
                    let loan = Loan::find_by_id(req.loan_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Loan {} not found", req.loan_id))
                        })?;

                    if LoanStatus::from_str(&loan.status) != Some(LoanStatus::Active) {
                        return Err(ServiceError::InvalidOperation(format!(
                            "loan {} is not active",
                            loan.id
                        )));
                    }
                    if req.amount > loan.balance {
                        return Err(ServiceError::InvalidOperation(format!(
                            "payment {} exceeds outstanding balance {}",
                            req.amount, loan.balance
                        )));
                    }

                    let now = Utc::now();
                    let payment = loan_payment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        loan_id: Set(loan.id),
                        amount: Set(req.amount),
                        paid_at: Set(req.paid_at.unwrap_or(now)),
                        notes: Set(req.notes),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let new_balance = loan.balance - req.amount;
                    let mut active: loan::ActiveModel = loan.into();
                    active.balance = Set(new_balance);
                    if new_balance == Decimal::ZERO {
                        active.status = Set(LoanStatus::Repaid.as_str().to_string());
                    }
                    let loan = active.update(txn).await?;

                    Ok(LoanPaymentOutcome { payment, loan })
                })
            })
            .await?;

        info!(
            loan_id = %outcome.loan.id,
            remaining = %outcome.loan.balance,
            "loan payment recorded"
        );

        let event = Event::LoanPaymentRecorded {
            loan_id: outcome.loan.id,
            amount: outcome.payment.amount,
            remaining_balance: outcome.loan.balance,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send loan payment event");
        }

        Ok(outcome)
    }

    pub async fn list_payments(
        &self,
        loan_id: Uuid,
    ) -> Result<Vec<loan_payment::Model>, ServiceError> {
        Ok(LoanPayment::find()
            .filter(loan_payment::Column::LoanId.eq(loan_id))
            .order_by_asc(loan_payment::Column::PaidAt)
            .all(self.db_pool.as_ref())
            .await?)
    }
}

use crate::{
    db::DbPool,
    entities::ledger_entry::{self, Entity as LedgerEntry, EntrySide},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PostEntryRequest {
    pub debit_account: String,
    pub credit_account: String,
    pub amount: Decimal,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub description: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// The two halves of a posting, as committed.
#[derive(Debug, Clone, Serialize)]
pub struct PostedEntry {
    pub debit: ledger_entry::Model,
    pub credit: ledger_entry::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    pub account: String,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
}

/// Double-entry ledger. Entries only ever land as balanced debit/credit
/// pairs written in one transaction.
#[derive(Clone)]
pub struct AccountingService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl AccountingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Posts one debit and one matching credit atomically.
    #[instrument(skip(self, request), fields(debit = %request.debit_account, credit = %request.credit_account))]
    pub async fn post_entry(
        &self,
        request: PostEntryRequest,
    ) -> Result<PostedEntry, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "posting amount must be positive".to_string(),
            ));
        }
        if request.debit_account == request.credit_account {
            return Err(ServiceError::InvalidInput(
                "debit and credit accounts must differ".to_string(),
            ));
        }

        let req = request.clone();
        let posted = self
            .db_pool
            .transaction::<_, PostedEntry, ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let occurred_at = req.occurred_at.unwrap_or(now);

                    let debit = ledger_entry::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        account: Set(req.debit_account.clone()),
                        side: Set(EntrySide::Debit.as_str().to_string()),
                        amount: Set(req.amount),
                        reference_type: Set(req.reference_type.clone()),
                        reference_id: Set(req.reference_id),
                        description: Set(req.description.clone()),
                        occurred_at: Set(occurred_at),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let credit = ledger_entry::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        account: Set(req.credit_account.clone()),
                        side: Set(EntrySide::Credit.as_str().to_string()),
                        amount: Set(req.amount),
                        reference_type: Set(req.reference_type),
                        reference_id: Set(req.reference_id),
                        description: Set(req.description),
                        occurred_at: Set(occurred_at),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    Ok(PostedEntry { debit, credit })
                })
            })
            .await?;

        info!(amount = %posted.debit.amount, "ledger pair posted");

        let event = Event::LedgerPosted {
            debit_account: posted.debit.account.clone(),
            credit_account: posted.credit.account.clone(),
            amount: posted.debit.amount,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send ledger event");
        }

        Ok(posted)
    }

    pub async fn list_entries(
        &self,
        account: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ledger_entry::Model>, u64), ServiceError> {
        let mut query = LedgerEntry::find().order_by_desc(ledger_entry::Column::OccurredAt);
        if let Some(account) = account {
            query = query.filter(ledger_entry::Column::Account.eq(account));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((entries, total))
    }

    /// Debit and credit totals per account, folded in memory like every
    /// other summary in this codebase.
    pub async fn trial_balance(&self) -> Result<Vec<TrialBalanceRow>, ServiceError> {
        let entries = LedgerEntry::find().all(self.db_pool.as_ref()).await?;

        let mut totals: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for entry in entries {
            let slot = totals
                .entry(entry.account.clone())
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match EntrySide::from_str(&entry.side) {
                Some(EntrySide::Debit) => slot.0 += entry.amount,
                Some(EntrySide::Credit) => slot.1 += entry.amount,
                None => {
                    warn!(side = %entry.side, "unknown ledger side in aggregation");
                }
            }
        }

        Ok(totals
            .into_iter()
            .map(|(account, (debit_total, credit_total))| TrialBalanceRow {
                account,
                debit_total,
                credit_total,
            })
            .collect())
    }
}

use crate::{
    db::DbPool,
    entities::{
        inventory_item::Entity as InventoryItem,
        inventory_transaction::MovementDirection,
        production_batch::{self, BatchStatus, Entity as ProductionBatch},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{self, InventoryService, MovementRequest},
    services::sequence::{self, PREFIX_BATCH},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateBatchRequest {
    pub output_item_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Production batches turning harvested raw material into stocked goods.
#[derive(Clone)]
pub struct ManufacturingService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    inventory: InventoryService,
}

impl ManufacturingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, inventory: InventoryService) -> Self {
        Self {
            db_pool,
            event_sender,
            inventory,
        }
    }

    pub async fn create_batch(
        &self,
        request: CreateBatchRequest,
    ) -> Result<production_batch::Model, ServiceError> {
        if request.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "batch quantity must be positive".to_string(),
            ));
        }

        let req = request.clone();
        let batch = self
            .db_pool
            .transaction::<_, production_batch::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    InventoryItem::find_by_id(req.output_item_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Inventory item {} not found",
                                req.output_item_id
                            ))
                        })?;

                    let now = Utc::now();
                    let batch_number =
                        sequence::next_receipt_number(txn, PREFIX_BATCH, now).await?;

                    let batch = production_batch::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        batch_number: Set(batch_number),
                        output_item_id: Set(req.output_item_id),
                        quantity: Set(req.quantity),
                        status: Set(BatchStatus::Planned.as_str().to_string()),
                        notes: Set(req.notes),
                        started_at: Set(None),
                        completed_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    Ok(batch)
                })
            })
            .await?;

        info!(batch_number = %batch.batch_number, "production batch created");
        Ok(batch)
    }

    pub async fn get_batch(
        &self,
        id: Uuid,
    ) -> Result<Option<production_batch::Model>, ServiceError> {
        Ok(ProductionBatch::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?)
    }

    pub async fn list_batches(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<production_batch::Model>, u64), ServiceError> {
        let mut query =
            ProductionBatch::find().order_by_desc(production_batch::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(production_batch::Column::Status.eq(status));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let batches = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((batches, total))
    }

    pub async fn start_batch(&self, id: Uuid) -> Result<production_batch::Model, ServiceError> {
        let batch = ProductionBatch::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Production batch {} not found", id)))?;

        if BatchStatus::from_str(&batch.status) != Some(BatchStatus::Planned) {
            return Err(ServiceError::InvalidOperation(format!(
                "batch {} cannot be started from status '{}'",
                id, batch.status
            )));
        }

        let mut active: production_batch::ActiveModel = batch.into();
        active.status = Set(BatchStatus::InProgress.as_str().to_string());
        active.started_at = Set(Some(Utc::now()));
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Completes a batch: the status flip and the IN movement booking the
    /// produced quantity into stock share one transaction, so finished goods
    /// are never counted twice or lost between the two writes.
    #[instrument(skip(self))]
    pub async fn complete_batch(&self, id: Uuid) -> Result<production_batch::Model, ServiceError> {
        let allow_negative = self.inventory.allow_negative_stock();
        let (batch, outcome) = self
            .db_pool
            .transaction::<_, (production_batch::Model, inventory::MovementOutcome), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let batch = ProductionBatch::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Production batch {} not found",
                                    id
                                ))
                            })?;

                        if BatchStatus::from_str(&batch.status) != Some(BatchStatus::InProgress) {
                            return Err(ServiceError::InvalidOperation(format!(
                                "batch {} cannot be completed from status '{}'",
                                id, batch.status
                            )));
                        }

                        let mut request = MovementRequest::new(
                            batch.output_item_id,
                            MovementDirection::In,
                            batch.quantity,
                        );
                        request.reference_type = Some("production_batch".to_string());
                        request.reference_id = Some(batch.id);
                        let outcome =
                            inventory::apply_movement(txn, &request, allow_negative).await?;

                        let mut active: production_batch::ActiveModel = batch.into();
                        active.status = Set(BatchStatus::Completed.as_str().to_string());
                        active.completed_at = Set(Some(Utc::now()));
                        let batch = active.update(txn).await?;

                        Ok((batch, outcome))
                    })
                },
            )
            .await?;

        info!(batch_number = %batch.batch_number, quantity = batch.quantity, "production batch completed");

        let event = Event::ProductionBatchCompleted {
            batch_id: batch.id,
            output_item_id: batch.output_item_id,
            quantity: batch.quantity,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send batch completed event");
        }
        self.inventory.emit_movement_events(&outcome).await;

        Ok(batch)
    }
}

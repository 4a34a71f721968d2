use crate::{
    db::DbPool,
    entities::{
        inventory_item::Entity as InventoryItem,
        inventory_transaction::MovementDirection,
        sale::{self, Entity as Sale, SaleStatus},
        sale_item::{self, Entity as SaleItem},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{self, InventoryService, MovementOutcome, MovementRequest},
    services::sequence::{self, PREFIX_SALE},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaleItemRequest {
    pub item_id: Uuid,
    pub quantity: i32,
    /// Overrides the item's list price when present.
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateSaleRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    /// draft | pending | completed; defaults to draft.
    pub status: Option<String>,
    pub sale_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "At least one sale item is required"))]
    pub items: Vec<SaleItemRequest>,
}

/// A sale read back together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: sale::Model,
    pub items: Vec<sale_item::Model>,
}

/// Sales CRUD plus the grouped-write path that creates a sale, its line
/// items, and (for completed sales) the per-line stock decrements in one
/// transaction.
#[derive(Clone)]
pub struct SaleService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    inventory: InventoryService,
}

impl SaleService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, inventory: InventoryService) -> Self {
        Self {
            db_pool,
            event_sender,
            inventory,
        }
    }

    /// Creates a sale with its items as one atomic unit.
    ///
    /// Within a single transaction: synthesizes the order number, inserts the
    /// header (total derived from the lines), inserts every line, and, when
    /// the requested status is `completed`, applies an OUT movement per line
    /// through the shared movement path. Any failure rolls back the whole
    /// group: no header, no orphan items, no partial decrement. Resubmitting
    /// the same request creates a second sale; there is no deduplication key.
    #[instrument(skip(self, request), fields(customer = %request.customer_name, lines = request.items.len()))]
    pub async fn create_sale_with_items(
        &self,
        request: CreateSaleRequest,
    ) -> Result<SaleWithItems, ServiceError> {
        request.validate()?;

        let status = match &request.status {
            Some(raw) => SaleStatus::from_str(raw).ok_or_else(|| {
                ServiceError::InvalidInput(format!("unknown sale status '{}'", raw))
            })?,
            None => SaleStatus::Draft,
        };
        if status == SaleStatus::Cancelled {
            return Err(ServiceError::InvalidOperation(
                "a sale cannot be created as cancelled".to_string(),
            ));
        }
        if request.items.iter().any(|line| line.quantity <= 0) {
            return Err(ServiceError::InvalidInput(
                "sale item quantities must be positive".to_string(),
            ));
        }

        let allow_negative = self.inventory.allow_negative_stock();
        let req = request.clone();
        let (sale, items, movements) = self
            .db_pool
            .transaction::<_, (sale::Model, Vec<sale_item::Model>, Vec<MovementOutcome>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        insert_sale_with_items(txn, &req, status, allow_negative).await
                    })
                },
            )
            .await?;

        info!(sale_id = %sale.id, order_number = %sale.order_number, "sale created");

        if let Err(e) = self.event_sender.send(Event::SaleCreated(sale.id)).await {
            warn!(error = %e, "failed to send sale created event");
        }
        if status == SaleStatus::Completed {
            if let Err(e) = self.event_sender.send(Event::SaleCompleted(sale.id)).await {
                warn!(error = %e, "failed to send sale completed event");
            }
        }
        for outcome in &movements {
            self.inventory.emit_movement_events(outcome).await;
        }

        Ok(SaleWithItems { sale, items })
    }

    /// Transitions a draft or pending sale to completed, applying the
    /// per-line OUT movements atomically with the status update.
    #[instrument(skip(self))]
    pub async fn complete_sale(&self, sale_id: Uuid) -> Result<SaleWithItems, ServiceError> {
        let allow_negative = self.inventory.allow_negative_stock();
        let (sale, items, movements) = self
            .db_pool
            .transaction::<_, (sale::Model, Vec<sale_item::Model>, Vec<MovementOutcome>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let sale = Sale::find_by_id(sale_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!("Sale {} not found", sale_id))
                            })?;

                        match SaleStatus::from_str(&sale.status) {
                            Some(SaleStatus::Draft) | Some(SaleStatus::Pending) => {}
                            _ => {
                                return Err(ServiceError::InvalidOperation(format!(
                                    "sale {} cannot be completed from status '{}'",
                                    sale_id, sale.status
                                )))
                            }
                        }

                        let items = SaleItem::find()
                            .filter(sale_item::Column::SaleId.eq(sale_id))
                            .all(txn)
                            .await?;

                        let movements =
                            apply_sale_movements(txn, sale.id, &items, allow_negative).await?;

                        let mut active: sale::ActiveModel = sale.into();
                        active.status = Set(SaleStatus::Completed.as_str().to_string());
                        let sale = active.update(txn).await?;

                        Ok((sale, items, movements))
                    })
                },
            )
            .await?;

        info!(sale_id = %sale.id, "sale completed");
        if let Err(e) = self.event_sender.send(Event::SaleCompleted(sale.id)).await {
            warn!(error = %e, "failed to send sale completed event");
        }
        for outcome in &movements {
            self.inventory.emit_movement_events(outcome).await;
        }

        Ok(SaleWithItems { sale, items })
    }

    /// Cancels a sale that has not yet touched inventory.
    pub async fn cancel_sale(&self, sale_id: Uuid) -> Result<sale::Model, ServiceError> {
        let sale = Sale::find_by_id(sale_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale {} not found", sale_id)))?;

        match SaleStatus::from_str(&sale.status) {
            Some(SaleStatus::Draft) | Some(SaleStatus::Pending) => {}
            _ => {
                return Err(ServiceError::InvalidOperation(format!(
                    "sale {} cannot be cancelled from status '{}'",
                    sale_id, sale.status
                )))
            }
        }

        let mut active: sale::ActiveModel = sale.into();
        active.status = Set(SaleStatus::Cancelled.as_str().to_string());
        let sale = active.update(self.db_pool.as_ref()).await?;

        if let Err(e) = self.event_sender.send(Event::SaleCancelled(sale.id)).await {
            warn!(error = %e, "failed to send sale cancelled event");
        }
        Ok(sale)
    }

    pub async fn get_sale_with_items(
        &self,
        sale_id: Uuid,
    ) -> Result<Option<SaleWithItems>, ServiceError> {
        let Some(sale) = Sale::find_by_id(sale_id).one(self.db_pool.as_ref()).await? else {
            return Ok(None);
        };
        let items = SaleItem::find()
            .filter(sale_item::Column::SaleId.eq(sale_id))
            .all(self.db_pool.as_ref())
            .await?;
        Ok(Some(SaleWithItems { sale, items }))
    }

    pub async fn list_sales(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<sale::Model>, u64), ServiceError> {
        let mut query = Sale::find().order_by_desc(sale::Column::SaleDate);
        if let Some(status) = status {
            query = query.filter(sale::Column::Status.eq(status));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let sales = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((sales, total))
    }
}

async fn insert_sale_with_items(
    txn: &DatabaseTransaction,
    request: &CreateSaleRequest,
    status: SaleStatus,
    allow_negative_stock: bool,
) -> Result<(sale::Model, Vec<sale_item::Model>, Vec<MovementOutcome>), ServiceError> {
    let now = Utc::now();
    let order_number = sequence::next_receipt_number(txn, PREFIX_SALE, now).await?;
    let sale_id = Uuid::new_v4();

    // Resolve prices first so the header total is derived from the lines.
    let mut lines = Vec::with_capacity(request.items.len());
    let mut total = Decimal::ZERO;
    for line in &request.items {
        let item = InventoryItem::find_by_id(line.item_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", line.item_id))
            })?;
        let unit_price = line.unit_price.unwrap_or(item.unit_price);
        let line_total = sale_item::Model::line_total_of(line.quantity, unit_price);
        total += line_total;
        lines.push((line.item_id, line.quantity, unit_price, line_total));
    }

    let sale = sale::ActiveModel {
        id: Set(sale_id),
        order_number: Set(order_number),
        customer_name: Set(request.customer_name.clone()),
        status: Set(status.as_str().to_string()),
        total_amount: Set(total),
        sale_date: Set(request.sale_date.unwrap_or(now)),
        notes: Set(request.notes.clone()),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(txn)
    .await?;

    for (item_id, quantity, unit_price, line_total) in &lines {
        sale_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sale_id: Set(sale_id),
            item_id: Set(*item_id),
            quantity: Set(*quantity),
            unit_price: Set(*unit_price),
            line_total: Set(*line_total),
        }
        .insert(txn)
        .await?;
    }

    // Read back rather than echoing the request.
    let items = SaleItem::find()
        .filter(sale_item::Column::SaleId.eq(sale_id))
        .all(txn)
        .await?;

    let movements = if status == SaleStatus::Completed {
        apply_sale_movements(txn, sale_id, &items, allow_negative_stock).await?
    } else {
        Vec::new()
    };

    Ok((sale, items, movements))
}

/// OUT movement per line, through the shared coordinator path so each
/// decrement is paired with its transaction-log row.
async fn apply_sale_movements(
    txn: &DatabaseTransaction,
    sale_id: Uuid,
    items: &[sale_item::Model],
    allow_negative_stock: bool,
) -> Result<Vec<MovementOutcome>, ServiceError> {
    let mut outcomes = Vec::with_capacity(items.len());
    for line in items {
        let mut request = MovementRequest::new(line.item_id, MovementDirection::Out, line.quantity);
        request.reference_type = Some("sale".to_string());
        request.reference_id = Some(sale_id);
        outcomes.push(inventory::apply_movement(txn, &request, allow_negative_stock).await?);
    }
    Ok(outcomes)
}

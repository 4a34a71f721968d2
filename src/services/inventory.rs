use crate::{
    db::DbPool,
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        inventory_transaction::{self, Entity as InventoryTransaction, MovementDirection},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A requested quantity change for one item.
#[derive(Debug, Clone)]
pub struct MovementRequest {
    pub item_id: Uuid,
    pub direction: MovementDirection,
    pub quantity: i32,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
    pub recorded_by: Option<String>,
}

impl MovementRequest {
    pub fn new(item_id: Uuid, direction: MovementDirection, quantity: i32) -> Self {
        Self {
            item_id,
            direction,
            quantity,
            reference_type: None,
            reference_id: None,
            reason: None,
            recorded_by: None,
        }
    }
}

/// The committed pair: the movement's log row and the item as it looks after
/// the mutation.
#[derive(Debug, Clone)]
pub struct MovementOutcome {
    pub transaction: inventory_transaction::Model,
    pub item: inventory_item::Model,
}

#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub quantity: i32,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<Option<i32>>,
    pub unit_price: Option<Decimal>,
}

/// Applies one movement on an already-open transaction: inserts the
/// `inventory_transactions` row, then applies the signed delta to the item.
/// Both writes commit or roll back with the surrounding transaction. This
/// is the shared path used by direct movements, sale completion, and
/// production batch completion, so a log row can never exist without its
/// quantity mutation or vice versa.
pub(crate) async fn apply_movement(
    txn: &DatabaseTransaction,
    request: &MovementRequest,
    allow_negative_stock: bool,
) -> Result<MovementOutcome, ServiceError> {
    let item = InventoryItem::find_by_id(request.item_id)
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Inventory item {} not found", request.item_id))
        })?;

    let delta = request.direction.signed(request.quantity);
    let new_quantity = item.quantity + delta;

    if new_quantity < 0 && !allow_negative_stock {
        return Err(ServiceError::InsufficientStock(format!(
            "item {}: on hand {}, requested {}",
            item.sku, item.quantity, request.quantity
        )));
    }

    let transaction = inventory_transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item.id),
        direction: Set(request.direction.as_str().to_string()),
        quantity: Set(request.quantity),
        previous_quantity: Set(item.quantity),
        new_quantity: Set(new_quantity),
        reference_type: Set(request.reference_type.clone()),
        reference_id: Set(request.reference_id),
        reason: Set(request.reason.clone()),
        recorded_by: Set(request.recorded_by.clone()),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;

    let mut active_item: inventory_item::ActiveModel = item.into();
    active_item.quantity = Set(new_quantity);
    let item = active_item.update(txn).await?;

    Ok(MovementOutcome { transaction, item })
}

/// Inventory item CRUD plus the movement coordinator.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    allow_negative_stock: bool,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, allow_negative_stock: bool) -> Self {
        Self {
            db_pool,
            event_sender,
            allow_negative_stock,
        }
    }

    pub(crate) fn allow_negative_stock(&self) -> bool {
        self.allow_negative_stock
    }

    /// Records a movement as one atomic unit: the transaction log row and the
    /// quantity mutation either both commit or neither does. No retries; a
    /// failed call leaves the item and its log exactly as they were.
    #[instrument(skip(self, request), fields(item_id = %request.item_id, direction = request.direction.as_str(), quantity = request.quantity))]
    pub async fn record_movement(
        &self,
        request: MovementRequest,
    ) -> Result<MovementOutcome, ServiceError> {
        if request.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "movement quantity must be positive".to_string(),
            ));
        }

        let allow_negative = self.allow_negative_stock;
        let outcome = self
            .db_pool
            .transaction::<_, MovementOutcome, ServiceError>(move |txn| {
                Box::pin(async move { apply_movement(txn, &request, allow_negative).await })
            })
            .await?;

        info!(
            item_id = %outcome.item.id,
            new_quantity = outcome.item.quantity,
            "inventory movement recorded"
        );

        self.emit_movement_events(&outcome).await;

        Ok(outcome)
    }

    pub(crate) async fn emit_movement_events(&self, outcome: &MovementOutcome) {
        let event = Event::InventoryMovementRecorded {
            item_id: outcome.item.id,
            direction: outcome.transaction.direction.clone(),
            quantity: outcome.transaction.quantity,
            new_quantity: outcome.item.quantity,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to send movement event");
        }

        if outcome.item.is_low_stock() {
            let event = Event::LowStock {
                item_id: outcome.item.id,
                quantity: outcome.item.quantity,
                min_stock: outcome.item.min_stock,
            };
            if let Err(e) = self.event_sender.send(event).await {
                warn!(error = %e, "failed to send low stock event");
            }
        }
    }

    pub async fn create_item(
        &self,
        request: CreateItemRequest,
    ) -> Result<inventory_item::Model, ServiceError> {
        if request.quantity < 0 {
            return Err(ServiceError::InvalidInput(
                "initial quantity cannot be negative".to_string(),
            ));
        }

        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(request.sku),
            name: Set(request.name),
            quantity: Set(request.quantity),
            min_stock: Set(request.min_stock),
            max_stock: Set(request.max_stock),
            unit_price: Set(request.unit_price),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(item_id = %item.id, sku = %item.sku, "inventory item created");
        Ok(item)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Option<inventory_item::Model>, ServiceError> {
        Ok(InventoryItem::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?)
    }

    pub async fn list_items(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let paginator = InventoryItem::find()
            .order_by_asc(inventory_item::Column::Sku)
            .paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn list_low_stock(&self) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let items = InventoryItem::find()
            .order_by_asc(inventory_item::Column::Sku)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(items.into_iter().filter(|i| i.is_low_stock()).collect())
    }

    /// Updates descriptive fields and thresholds. Quantity is deliberately
    /// not updatable here; it only moves through `record_movement`.
    pub async fn update_item(
        &self,
        id: Uuid,
        request: UpdateItemRequest,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = InventoryItem::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;

        let mut active: inventory_item::ActiveModel = item.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(min_stock) = request.min_stock {
            active.min_stock = Set(min_stock);
        }
        if let Some(max_stock) = request.max_stock {
            active.max_stock = Set(max_stock);
        }
        if let Some(unit_price) = request.unit_price {
            active.unit_price = Set(unit_price);
        }

        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = InventoryItem::delete_by_id(id)
            .exec(self.db_pool.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Inventory item {} not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn list_transactions(
        &self,
        item_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_transaction::Model>, u64), ServiceError> {
        let mut query = InventoryTransaction::find()
            .order_by_desc(inventory_transaction::Column::CreatedAt);
        if let Some(item_id) = item_id {
            query = query.filter(inventory_transaction::Column::ItemId.eq(item_id));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let transactions = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((transactions, total))
    }
}

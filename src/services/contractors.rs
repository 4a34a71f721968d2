use crate::{
    db::DbPool,
    entities::contractor::{self, Entity as Contractor},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateContractorRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateContractorRequest {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct ContractorService {
    db_pool: Arc<DbPool>,
}

impl ContractorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    pub async fn create_contractor(
        &self,
        request: CreateContractorRequest,
    ) -> Result<contractor::Model, ServiceError> {
        let contractor = contractor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            phone: Set(request.phone),
            address: Set(request.address),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(contractor_id = %contractor.id, "contractor created");
        Ok(contractor)
    }

    pub async fn get_contractor(
        &self,
        id: Uuid,
    ) -> Result<Option<contractor::Model>, ServiceError> {
        Ok(Contractor::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    pub async fn list_contractors(
        &self,
        active_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<contractor::Model>, u64), ServiceError> {
        let mut query = Contractor::find().order_by_asc(contractor::Column::Name);
        if active_only {
            query = query.filter(contractor::Column::IsActive.eq(true));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let contractors = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((contractors, total))
    }

    pub async fn update_contractor(
        &self,
        id: Uuid,
        request: UpdateContractorRequest,
    ) -> Result<contractor::Model, ServiceError> {
        let contractor = Contractor::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Contractor {} not found", id)))?;

        let mut active: contractor::ActiveModel = contractor.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Soft-deactivates rather than deleting; payment history references
    /// contractors.
    pub async fn deactivate_contractor(&self, id: Uuid) -> Result<contractor::Model, ServiceError> {
        self.update_contractor(
            id,
            UpdateContractorRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}

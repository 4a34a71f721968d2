use crate::{
    db::DbPool,
    entities::land::{self, Entity as Land},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateLandRequest {
    pub name: String,
    pub location: Option<String>,
    pub area_hectares: Decimal,
    pub crop: Option<String>,
    pub contractor_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLandRequest {
    pub name: Option<String>,
    pub location: Option<Option<String>>,
    pub area_hectares: Option<Decimal>,
    pub crop: Option<Option<String>>,
    pub contractor_id: Option<Option<Uuid>>,
    pub notes: Option<Option<String>>,
}

#[derive(Clone)]
pub struct LandService {
    db_pool: Arc<DbPool>,
}

impl LandService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    pub async fn create_land(
        &self,
        request: CreateLandRequest,
    ) -> Result<land::Model, ServiceError> {
        if request.area_hectares <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "land area must be positive".to_string(),
            ));
        }

        let land = land::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            location: Set(request.location),
            area_hectares: Set(request.area_hectares),
            crop: Set(request.crop),
            contractor_id: Set(request.contractor_id),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(land_id = %land.id, name = %land.name, "land created");
        Ok(land)
    }

    pub async fn get_land(&self, id: Uuid) -> Result<Option<land::Model>, ServiceError> {
        Ok(Land::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    pub async fn list_lands(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<land::Model>, u64), ServiceError> {
        let paginator = Land::find()
            .order_by_asc(land::Column::Name)
            .paginate(self.db_pool.as_ref(), per_page.max(1));
        let total = paginator.num_items().await?;
        let lands = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((lands, total))
    }

    pub async fn update_land(
        &self,
        id: Uuid,
        request: UpdateLandRequest,
    ) -> Result<land::Model, ServiceError> {
        let land = Land::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Land {} not found", id)))?;

        if let Some(area) = request.area_hectares {
            if area <= Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "land area must be positive".to_string(),
                ));
            }
        }

        let mut active: land::ActiveModel = land.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(location) = request.location {
            active.location = Set(location);
        }
        if let Some(area) = request.area_hectares {
            active.area_hectares = Set(area);
        }
        if let Some(crop) = request.crop {
            active.crop = Set(crop);
        }
        if let Some(contractor_id) = request.contractor_id {
            active.contractor_id = Set(contractor_id);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(notes);
        }

        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    pub async fn delete_land(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Land::delete_by_id(id).exec(self.db_pool.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Land {} not found", id)));
        }
        Ok(())
    }
}

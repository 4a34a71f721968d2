use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
    Adjustment,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
            MovementDirection::Adjustment => "adjustment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementDirection::In),
            "out" => Some(MovementDirection::Out),
            "adjustment" => Some(MovementDirection::Adjustment),
            _ => None,
        }
    }

    /// Signed delta this direction applies for a positive quantity.
    /// ADJUSTMENT books upward corrections only; downward corrections are
    /// recorded as OUT movements.
    pub fn signed(&self, quantity: i32) -> i32 {
        match self {
            MovementDirection::In | MovementDirection::Adjustment => quantity,
            MovementDirection::Out => -quantity,
        }
    }
}

/// Immutable log row for a single inventory movement. Never persisted without
/// the paired quantity mutation on `inventory_items` committing, and vice
/// versa.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub direction: String,
    pub quantity: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
    pub recorded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::ItemId",
        to = "super::inventory_item::Column::Id"
    )]
    Item,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.created_at {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_round_trips_through_str() {
        for dir in [
            MovementDirection::In,
            MovementDirection::Out,
            MovementDirection::Adjustment,
        ] {
            assert_eq!(MovementDirection::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(MovementDirection::from_str("sideways"), None);
    }

    #[test]
    fn only_out_negates_quantity() {
        assert_eq!(MovementDirection::Out.signed(5), -5);
        assert_eq!(MovementDirection::In.signed(5), 5);
        assert_eq!(MovementDirection::Adjustment.signed(5), 5);
    }
}

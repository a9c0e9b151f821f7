use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inventory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub set_id: Option<Uuid>,
    pub piece_id: Option<Uuid>,
    pub quantity: i32,
    /// Piece sub-list with quantities, stored as a JSON list
    pub pieces: Value,
    pub created_at: DateTime<Utc>,
}

/// One entry of the piece sub-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryPiece {
    pub piece_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CreateInventory {
    pub user_id: Uuid,
    pub set_id: Option<Uuid>,
    pub piece_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub pieces: Option<Vec<InventoryPiece>>,
}

impl CreateInventory {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err(ApiError::bad_request("The quantity field must be positive"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInventory {
    pub user_id: Option<Uuid>,
    pub set_id: Option<Uuid>,
    pub piece_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub pieces: Option<Vec<InventoryPiece>>,
}

impl UpdateInventory {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err(ApiError::bad_request("The quantity field must be positive"));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.set_id.is_none()
            && self.piece_id.is_none()
            && self.quantity.is_none()
            && self.pieces.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_list_quantity_defaults_to_one() {
        let piece: InventoryPiece =
            serde_json::from_value(serde_json::json!({ "piece_id": Uuid::new_v4() })).unwrap();
        assert_eq!(piece.quantity, 1);
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let dto = CreateInventory {
            user_id: Uuid::new_v4(),
            set_id: None,
            piece_id: None,
            quantity: Some(0),
            pieces: None,
        };
        assert!(dto.validate().is_err());
    }
}

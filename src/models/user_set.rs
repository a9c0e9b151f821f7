use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

use super::set::Set;

/// Set-ownership record, scoped to the authenticated caller
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub set_id: Uuid,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// Ownership record with the referenced Set populated
#[derive(Debug, Serialize)]
pub struct UserSetWithSet {
    #[serde(flatten)]
    pub user_set: UserSet,
    pub set: Option<Set>,
}

#[derive(Debug, Deserialize)]
pub struct AssignUserSet {
    pub set_id: Uuid,
    pub quantity: Option<i32>,
}

impl AssignUserSet {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err(ApiError::bad_request("The quantity field must be positive"));
            }
        }
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::validate_url_field;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Piece {
    pub id: Uuid,
    /// Globally unique reference code, the piece's natural key
    pub reference: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePiece {
    pub reference: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
}

impl CreatePiece {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.reference.trim().is_empty() {
            return Err(ApiError::bad_request("The reference field is required"));
        }
        if let Some(image_url) = &self.image_url {
            validate_url_field(image_url, "image_url")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePiece {
    pub reference: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
}

impl UpdatePiece {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(reference) = &self.reference {
            if reference.trim().is_empty() {
                return Err(ApiError::bad_request("The reference field cannot be empty"));
            }
        }
        if let Some(image_url) = &self.image_url {
            validate_url_field(image_url, "image_url")?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_none()
            && self.name.is_none()
            && self.color.is_none()
            && self.image_url.is_none()
    }
}

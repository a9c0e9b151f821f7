use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::validate_url_field;
use crate::error::ApiError;

use super::set::Set;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Manufacturer {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Manufacturer with its sets populated (`GET /manufacturers/:id?populate=sets`)
#[derive(Debug, Serialize)]
pub struct ManufacturerWithSets {
    #[serde(flatten)]
    pub manufacturer: Manufacturer,
    pub sets: Vec<Set>,
}

#[derive(Debug, Deserialize)]
pub struct CreateManufacturer {
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
}

impl CreateManufacturer {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("The name field is required"));
        }
        if let Some(website) = &self.website {
            validate_url_field(website, "website")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateManufacturer {
    pub name: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
}

impl UpdateManufacturer {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ApiError::bad_request("The name field cannot be empty"));
            }
        }
        if let Some(website) = &self.website {
            validate_url_field(website, "website")?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.country.is_none() && self.website.is_none()
    }
}

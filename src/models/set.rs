use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::validate_url_field;
use crate::error::ApiError;

use super::manufacturer::Manufacturer;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Set {
    pub id: Uuid,
    pub name: String,
    pub manufacturer_id: Uuid,
    /// Manufacturer-scoped reference code, unique per manufacturer
    pub manufacturer_reference: String,
    pub year: Option<i32>,
    pub theme: Option<String>,
    pub piece_count: Option<i32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Set with its manufacturer populated, as returned by the sets endpoints
#[derive(Debug, Serialize)]
pub struct SetWithManufacturer {
    #[serde(flatten)]
    pub set: Set,
    pub manufacturer: Option<Manufacturer>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSet {
    pub name: String,
    pub manufacturer_id: Uuid,
    pub manufacturer_reference: String,
    pub year: Option<i32>,
    pub theme: Option<String>,
    pub piece_count: Option<i32>,
    pub image_url: Option<String>,
}

impl CreateSet {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("The name field is required"));
        }
        if self.manufacturer_reference.trim().is_empty() {
            return Err(ApiError::bad_request(
                "The manufacturer_reference field is required",
            ));
        }
        if let Some(image_url) = &self.image_url {
            validate_url_field(image_url, "image_url")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSet {
    pub name: Option<String>,
    pub manufacturer_id: Option<Uuid>,
    pub manufacturer_reference: Option<String>,
    pub year: Option<i32>,
    pub theme: Option<String>,
    pub piece_count: Option<i32>,
    pub image_url: Option<String>,
}

impl UpdateSet {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ApiError::bad_request("The name field cannot be empty"));
            }
        }
        if let Some(reference) = &self.manufacturer_reference {
            if reference.trim().is_empty() {
                return Err(ApiError::bad_request(
                    "The manufacturer_reference field cannot be empty",
                ));
            }
        }
        if let Some(image_url) = &self.image_url {
            validate_url_field(image_url, "image_url")?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.manufacturer_id.is_none()
            && self.manufacturer_reference.is_none()
            && self.year.is_none()
            && self.theme.is_none()
            && self.piece_count.is_none()
            && self.image_url.is_none()
    }
}

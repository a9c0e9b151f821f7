use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::validate_url_field;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MarketplaceLink {
    pub id: Uuid,
    pub piece_id: Uuid,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMarketplaceLink {
    pub piece_id: Uuid,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl CreateMarketplaceLink {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(url) = &self.url {
            validate_url_field(url, "url")?;
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(ApiError::bad_request("The price field cannot be negative"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMarketplaceLink {
    pub piece_id: Option<Uuid>,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl UpdateMarketplaceLink {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(url) = &self.url {
            validate_url_field(url, "url")?;
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(ApiError::bad_request("The price field cannot be negative"));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.piece_id.is_none()
            && self.supplier.is_none()
            && self.url.is_none()
            && self.price.is_none()
            && self.currency.is_none()
    }
}

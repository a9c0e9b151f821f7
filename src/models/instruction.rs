use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::validate_url_field;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Instruction {
    pub id: Uuid,
    pub set_id: Uuid,
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub language: Option<String>,
    pub uploader_id: Option<Uuid>,
    /// Ordered build steps, stored as a JSON list
    pub steps: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInstruction {
    pub set_id: Uuid,
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub language: Option<String>,
    pub uploader_id: Option<Uuid>,
    pub steps: Option<Vec<Value>>,
}

impl CreateInstruction {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(file_url) = &self.file_url {
            validate_url_field(file_url, "file_url")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInstruction {
    pub set_id: Option<Uuid>,
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub language: Option<String>,
    pub uploader_id: Option<Uuid>,
    pub steps: Option<Vec<Value>>,
}

impl UpdateInstruction {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(file_url) = &self.file_url {
            validate_url_field(file_url, "file_url")?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.set_id.is_none()
            && self.title.is_none()
            && self.file_url.is_none()
            && self.language.is_none()
            && self.uploader_id.is_none()
            && self.steps.is_none()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

pub const COMMENT_TARGET_TYPES: &[&str] = &["set", "instruction"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    /// Author, resolved from the authenticated identity at creation
    pub user_id: Uuid,
    /// Polymorphic target: "set" or "instruction"
    pub target_type: String,
    pub target_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub target_type: String,
    pub target_id: Uuid,
    pub content: String,
}

impl CreateComment {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !COMMENT_TARGET_TYPES.contains(&self.target_type.as_str()) {
            return Err(ApiError::bad_request(
                "The target_type field must be one of: set, instruction",
            ));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::bad_request("The content field is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
}

impl UpdateComment {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(content) = &self.content {
            if content.trim().is_empty() {
                return Err(ApiError::bad_request("The content field cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_target_type() {
        let dto = CreateComment {
            target_type: "piece".into(),
            target_id: Uuid::new_v4(),
            content: "nice".into(),
        };
        let err = dto.validate().unwrap_err();
        assert!(err.message().contains("target_type"));
    }

    #[test]
    fn accepts_both_target_types() {
        for target_type in ["set", "instruction"] {
            let dto = CreateComment {
                target_type: target_type.into(),
                target_id: Uuid::new_v4(),
                content: "nice".into(),
            };
            assert!(dto.validate().is_ok());
        }
    }
}

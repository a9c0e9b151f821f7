use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

/// Symbols accepted by the password-strength policy.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self {
            sub: user_id,
            email,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

/// Sign a token for the given claims
pub fn issue_token(claims: &Claims) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(ApiError::internal_server_error("Token signing unavailable"));
    }

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("Token signing unavailable")
    })
}

/// Verify signature and expiry, returning the decoded claims.
/// Callers must not forward the error detail to clients.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = &config::config().security.jwt_secret;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Hash a password with the configured bcrypt cost factor
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(password, cost).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}

/// Compare a candidate password against a stored hash. A malformed stored
/// hash counts as a mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    matches!(bcrypt::verify(password, hash), Ok(true))
}

/// Enforce the password-strength policy: at least 8 characters with an
/// uppercase letter, a lowercase letter, a digit, and a symbol from
/// PASSWORD_SYMBOLS.
pub fn validate_password_strength(password: &str) -> Result<(), ApiError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "Password must be at least 8 characters long, contain upper and lower case letters, a number, and a special character.",
        ))
    }
}

/// Basic email shape validation for registration
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    Ok(())
}

/// Validate an optional URL-shaped field (website, image_url, file_url, ...)
pub fn validate_url_field(value: &str, field: &str) -> Result<(), ApiError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|_| ApiError::bad_request(format!("The {} field must be a valid URL", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_password_strength("Ab1!x").is_err());
    }

    #[test]
    fn rejects_missing_character_classes() {
        // no digit
        assert!(validate_password_strength("Abcdefg!").is_err());
        // no symbol
        assert!(validate_password_strength("Abcdefg1").is_err());
        // no uppercase
        assert!(validate_password_strength("abcdefg1!").is_err());
        // no lowercase
        assert!(validate_password_strength("ABCDEFG1!").is_err());
    }

    #[test]
    fn accepts_strong_password() {
        assert!(validate_password_strength("Sup3rSecret!").is_ok());
    }

    #[test]
    fn policy_message_mentions_the_rule() {
        let err = validate_password_strength("weak").unwrap_err();
        assert!(err.message().contains("at least 8 characters"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn url_field_validation() {
        assert!(validate_url_field("https://example.com/set.png", "image_url").is_ok());
        assert!(validate_url_field("not a url", "website").is_err());
    }

    #[test]
    fn password_hash_round_trips() {
        let hash = hash_password("Sup3rSecret!").unwrap();
        assert!(verify_password("Sup3rSecret!", &hash));
        assert!(!verify_password("WrongSecret1!", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("Sup3rSecret!", "not-a-bcrypt-hash"));
    }

    #[test]
    fn token_round_trips_with_expiry() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "user@example.com".into(), "user".into());
        assert!(claims.exp > claims.iat);

        let token = issue_token(&claims).unwrap();
        let decoded = verify_token(&token).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.email, "user@example.com");
        assert_eq!(decoded.role, "user");
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "user@example.com".into(),
            role: "user".into(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = issue_token(&claims).unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "user@example.com".into(), "user".into());
        let mut token = issue_token(&claims).unwrap();
        token.push('x');
        assert!(verify_token(&token).is_err());
    }
}

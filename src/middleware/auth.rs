use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Endpoint role requirements. Admin satisfies every requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn allows(self, required: Role) -> bool {
        self == Role::Admin || self == required
    }
}

/// Authenticated identity extracted from a verified token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Role gate, applied after identity resolution
    pub fn require_role(&self, required: Role) -> Result<(), ApiError> {
        if self.role.allows(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient role for this operation"))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        // Unknown role strings carry no privileges beyond a plain user
        let role = Role::parse(&claims.role).unwrap_or(Role::User);
        Self {
            id: claims.sub,
            email: claims.email,
            role,
        }
    }
}

/// JWT authentication middleware. Verifies the bearer token and injects the
/// decoded identity into request extensions; rejects with a generic 401 on
/// any failure without echoing verification detail.
pub async fn jwt_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = auth::verify_token(&token).map_err(|e| {
        tracing::debug!("token verification failed: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn admin_satisfies_user_requirement() {
        assert!(Role::Admin.allows(Role::User));
        assert!(Role::Admin.allows(Role::Admin));
        assert!(Role::User.allows(Role::User));
        assert!(!Role::User.allows(Role::Admin));
    }

    #[test]
    fn unknown_role_claim_degrades_to_user() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.co".into(), "superuser".into());
        let user = AuthUser::from(claims);
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn require_role_rejects_with_403() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            role: Role::User,
        };
        let err = user.require_role(Role::Admin).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Token abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}

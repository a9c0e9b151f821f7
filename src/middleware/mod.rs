pub mod auth;

pub use auth::{jwt_auth, AuthUser, Role};

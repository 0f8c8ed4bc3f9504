//! Authentication module
//!
//! Token issuance belongs to the external identity provider; this service
//! only verifies access tokens and attaches the caller's identity to the
//! request.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};

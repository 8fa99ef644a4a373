//! Authentication module
//!
//! Validates bearer JWTs issued by the identity provider. Token issuance for
//! end users lives outside this service.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;

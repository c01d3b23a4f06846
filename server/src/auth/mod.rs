//! Authentication
//!
//! Access-token validation and the `AuthUser` request extractor. Token
//! issuance is handled by the external identity service; this server only
//! resolves the request credential to a user record.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, AuthUser};

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::TokenVerifier;
pub use middleware::{current_identity, AccessGate, AuthenticatedUser};

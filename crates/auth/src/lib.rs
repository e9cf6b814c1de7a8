//! `orderflow-auth` — caller identity boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Token
//! issuance and verification belong to the upstream gateway; this crate only
//! resolves a presented credential into the identity of the caller.

pub mod identity;
pub mod resolver;

pub use identity::CallerIdentity;
pub use resolver::{AuthError, GatewaySubjectResolver, IdentityResolver};

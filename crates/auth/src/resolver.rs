use std::sync::Arc;

use thiserror::Error;

use orderflow_core::UserId;

use crate::CallerIdentity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented at all.
    #[error("missing credential")]
    MissingCredential,

    /// A credential was presented but could not be resolved to a caller.
    #[error("invalid credential")]
    InvalidCredential,
}

/// Resolves a presented credential into a caller identity.
///
/// Implementations must be deterministic and must not panic on hostile
/// input.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, credential: &str) -> Result<CallerIdentity, AuthError>;
}

impl<R> IdentityResolver for Arc<R>
where
    R: IdentityResolver + ?Sized,
{
    fn resolve(&self, credential: &str) -> Result<CallerIdentity, AuthError> {
        (**self).resolve(credential)
    }
}

/// Resolver for deployments behind an authenticating gateway.
///
/// The gateway has already verified the token and forwards the subject as
/// the bearer credential, so the credential *is* the caller's user id.
/// Signature verification / token decoding is intentionally outside this
/// crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewaySubjectResolver;

impl GatewaySubjectResolver {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityResolver for GatewaySubjectResolver {
    fn resolve(&self, credential: &str) -> Result<CallerIdentity, AuthError> {
        let user_id = UserId::new(credential).map_err(|_| AuthError::InvalidCredential)?;
        Ok(CallerIdentity::new(user_id))
    }
}

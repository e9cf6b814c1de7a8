use orderflow_auth::CallerIdentity;
use orderflow_core::UserId;

/// Caller context for a request.
///
/// This is immutable and must be present for all order routes; the auth
/// middleware inserts it after resolving the bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    identity: CallerIdentity,
}

impl CallerContext {
    pub fn new(identity: CallerIdentity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> &UserId {
        self.identity.user_id()
    }
}

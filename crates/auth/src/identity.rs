use serde::Serialize;

use orderflow_core::UserId;

/// Identity of an authenticated caller (human user, service account, etc).
///
/// By the time a request crosses into workflow code this is the only
/// authentication fact that matters: which user the caller acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    user_id: UserId,
}

impl CallerIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn into_user_id(self) -> UserId {
        self.user_id
    }
}

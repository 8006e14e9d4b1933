use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identity bound to a request after its bearer token was validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    user_id: UserId,
    username: String,
    email: String,
}

impl AuthenticatedUser {
    /// Creates an authenticated identity from validated token claims.
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Returns the numeric user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the username captured at token issue time.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the email captured at token issue time.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

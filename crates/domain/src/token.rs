use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Purpose of a signed token, carried as the `kind` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token accepted by the request authenticator.
    Access,
    /// Long-lived token accepted only by the refresh flow.
    Refresh,
}

impl TokenKind {
    /// Returns the claim value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}


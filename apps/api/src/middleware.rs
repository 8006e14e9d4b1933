mod bearer;
mod guard;

pub use bearer::{optional_bearer_auth, require_bearer_auth};
pub use guard::{AccessGuard, AccessRequirement, require_access};

#[cfg(test)]
mod tests;

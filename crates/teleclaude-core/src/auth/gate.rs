//! Sign-in authorization predicate.

use std::sync::Arc;

use super::{AllowList, Identity};

/// Decides whether an authenticated identity may create a session.
///
/// Holds no mutable state: the same identity always gets the same answer.
#[derive(Debug, Clone)]
pub struct AccessGate {
    allow_list: Arc<AllowList>,
}

impl AccessGate {
    /// Create a gate over an injected allow-list
    pub fn new(allow_list: Arc<AllowList>) -> Self {
        Self { allow_list }
    }

    /// Authorize iff the identity's email is on the allow-list.
    ///
    /// A missing or empty email is denied like any unlisted address.
    pub fn authorize(&self, identity: &Identity) -> bool {
        match identity.email() {
            Some(email) => self.allow_list.contains(email),
            None => false,
        }
    }

    /// The allow-list this gate checks against
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }
}

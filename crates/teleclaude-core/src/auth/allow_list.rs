//! Fixed set of email addresses allowed to sign in.

use std::collections::HashSet;

/// Immutable allow-list of email addresses.
///
/// Built once at startup and shared read-only. Membership is exact string
/// equality: no trimming and no case folding.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    /// Build an allow-list from configured addresses.
    ///
    /// Empty entries are dropped so that an empty email can never match.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let emails = emails
            .into_iter()
            .map(Into::into)
            .filter(|e: &String| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Whether the address is listed
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    /// Number of listed addresses
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Whether nobody is allowed in
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

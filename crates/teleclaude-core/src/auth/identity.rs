use serde::{Deserialize, Serialize};

/// Identity asserted by the external identity provider.
///
/// Only lives for the duration of a sign-in exchange. The provider may
/// omit any field, including the email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-side account id
    pub provider_id: Option<String>,
    /// Account login / handle
    pub login: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Email claim
    pub email: Option<String>,
}

impl Identity {
    /// Identity carrying only an email claim
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Email claim, treating an empty string as absent
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

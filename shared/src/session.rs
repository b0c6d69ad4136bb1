//! Admin credential handling.
//!
//! Mutations are authorized by a static shared secret sent in the
//! [`ADMIN_AUTH_HEADER`] header. The client keeps its credential in an
//! explicit [`AdminSession`] value instead of ambient state.

/// Header carrying the admin shared secret on mutating requests.
pub const ADMIN_AUTH_HEADER: &str = "x-admin-auth";

/// Credential held by an admin client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    credential: Option<String>,
}

impl AdminSession {
    /// Session without a credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session presenting `credential`; blank input yields an anonymous
    /// session.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        let credential = credential.into();
        Self {
            credential: (!credential.trim().is_empty()).then_some(credential),
        }
    }

    /// Credential to send, if any.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }
}

/// Whether the session can attempt mutations at all.
pub fn is_authorized(session: &AdminSession) -> bool {
    session.credential.is_some()
}

/// Byte-for-byte comparison of a presented credential with the secret.
/// A missing credential never matches.
pub fn credential_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(value) => !expected.is_empty() && value.as_bytes() == expected.as_bytes(),
        None => false,
    }
}

//! Authentication types for the domain layer.
//!
//! Identity is established by an external collaborator before any chat
//! operation runs. These types carry the result of that check into the core
//! through the `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Participant whose identity has already been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The participant's identifier.
    pub id: UserId,

    /// Display name, if the identity provider supplies one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("Authentication required")]
    MissingCredentials,

    /// The token is unknown or malformed.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The identity service could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

//! Static token table implementing `SessionValidator` and `UserDirectory`.
//!
//! Identity belongs to an external service; this adapter stands in for it
//! with a fixed token → user table loaded from configuration, e.g.
//! `PAIRCHAT__AUTH__TOKENS="alice-token=1,bob-token=2"`.
//!
//! # Example
//!
//! ```ignore
//! let validator = StaticTokenValidator::parse("alice-token=1,bob-token=2")?;
//! let user = validator.validate("alice-token").await?;
//! assert_eq!(user.id.as_i64(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, DomainError, ErrorCode, UserId, ValidationError,
};
use crate::ports::{SessionValidator, UserDirectory};

/// Token table validator.
///
/// Tokens not in the table return `InvalidToken`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, AuthenticatedUser>,
    unavailable: Option<String>,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list of `token=user_id` pairs.
    pub fn parse(entries: &str) -> Result<Self, ValidationError> {
        let mut validator = Self::new();

        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, user_id) = entry.split_once('=').ok_or_else(|| {
                ValidationError::invalid_format(
                    "auth.tokens",
                    format!("expected token=user_id, got '{}'", entry),
                )
            })?;
            let token = token.trim();
            if token.is_empty() {
                return Err(ValidationError::empty_field("auth.tokens token"));
            }
            let user_id: UserId = user_id.parse()?;
            validator = validator.with_user(token, AuthenticatedUser::new(user_id));
        }

        Ok(validator)
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Makes every validation fail as if the identity service were down.
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(reason) = &self.unavailable {
            return Err(AuthError::ServiceUnavailable(reason.clone()));
        }

        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[async_trait]
impl UserDirectory for StaticTokenValidator {
    async fn list_users(&self) -> Result<Vec<AuthenticatedUser>, DomainError> {
        if let Some(reason) = &self.unavailable {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("User directory unavailable: {}", reason),
            ));
        }

        // Several tokens may name the same user
        let users: BTreeMap<UserId, &AuthenticatedUser> =
            self.tokens.values().map(|user| (user.id, user)).collect();
        Ok(users.into_values().cloned().collect())
    }
}

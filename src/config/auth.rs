//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::StaticTokenValidator;

/// Authentication configuration
///
/// `tokens` is a comma-separated `token=user_id` list consumed by the static
/// token validator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: String,
}

impl AuthConfig {
    /// Builds the validator described by `tokens`.
    pub fn validator(&self) -> Result<StaticTokenValidator, ValidationError> {
        StaticTokenValidator::parse(&self.tokens)
            .map_err(|e| ValidationError::InvalidAuthTokens(e.to_string()))
    }

    /// Validate authentication configuration
    ///
    /// Production must configure at least one token.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let validator = self.validator()?;
        if validator.is_empty() && environment == Environment::Production {
            return Err(ValidationError::MissingRequired("AUTH__TOKENS"));
        }
        Ok(())
    }
}

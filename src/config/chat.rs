//! Chat engine tuning

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::chat::DEFAULT_MAX_MESSAGE_LENGTH;

/// Chat configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Messages buffered per connection before it is evicted as too slow
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    /// Longest accepted message, in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbound_queue_capacity == 0 || self.outbound_queue_capacity > 10_000 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.max_message_length == 0 {
            return Err(ValidationError::InvalidMessageLength);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue_capacity(),
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_outbound_queue_capacity() -> usize {
    64
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

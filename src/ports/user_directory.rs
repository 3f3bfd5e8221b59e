//! User directory port.
//!
//! Lists the participants the identity collaborator knows about, so a client
//! can pick a peer before resolving a room with them.

use async_trait::async_trait;

use crate::domain::foundation::{AuthenticatedUser, DomainError};

/// Read-only view of known participants.
///
/// # Contract
///
/// - One entry per user id, ordered by ascending id
/// - Return `DomainError` if the directory cannot be read
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<AuthenticatedUser>, DomainError>;
}

//! ListPeersHandler - users the caller could open a room with.

use std::sync::Arc;

use crate::domain::chat::ChatError;
use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::ports::UserDirectory;

#[derive(Debug, Clone, Copy)]
pub struct ListPeersQuery {
    pub user_id: UserId,
}

pub struct ListPeersHandler {
    directory: Arc<dyn UserDirectory>,
}

impl ListPeersHandler {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Every known user except the caller, in directory order.
    pub async fn handle(&self, query: ListPeersQuery) -> Result<Vec<AuthenticatedUser>, ChatError> {
        let users = self.directory.list_users().await?;
        Ok(users
            .into_iter()
            .filter(|user| user.id != query.user_id)
            .collect())
    }
}

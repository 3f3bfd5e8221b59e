//! Response types for the user directory endpoint.

use serde::Serialize;

use crate::domain::foundation::AuthenticatedUser;

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.id.as_i64(),
            display_name: user.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

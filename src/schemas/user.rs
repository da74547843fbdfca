use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize)]
pub(crate) struct UserCreate {
    #[serde(alias = "fullName")]
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleUpdate {
    pub(crate) role: UserRole,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) avatar: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) headline: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            bio: user.bio,
            headline: user.headline,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
        }
    }
}

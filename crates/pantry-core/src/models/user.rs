use serde::{Deserialize, Serialize};

use crate::models::EntityId;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Bearer token plus the user it was issued for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

use serde::{Deserialize, Serialize};

use crate::model::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Key fields a user can be matched on
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UserField {
    Id,
    Email,
}

/// Partial update for a user; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

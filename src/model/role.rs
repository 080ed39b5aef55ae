use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Employee,
    Hr,
    Owner,
}

impl Role {
    /// Label shown next to the role in staff forms
    pub fn title(&self) -> &'static str {
        match self {
            Role::Employee => "Field Employee",
            Role::Hr => "HR Manager",
            Role::Owner => "Owner / Director",
        }
    }

    pub fn is_employee(&self) -> bool {
        *self == Role::Employee
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    #[default]
    High,
}

/// Broadcast from management to all staff. Never edited once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: String,
    pub author: String,
    pub content: String,
    pub date: NaiveDate,
    pub priority: Priority,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InstructionField {
    Id,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionPatch {
    pub content: Option<String>,
    pub priority: Option<Priority>,
}

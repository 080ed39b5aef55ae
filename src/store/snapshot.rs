use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::model::attendance::AttendanceRecord;
use crate::model::instruction::Instruction;
use crate::model::salary::SalaryRecord;
use crate::model::task::Task;
use crate::model::user::User;
use crate::store::record::Record;

/// Everything the store holds. Serializes to the durable slot layout:
/// one JSON object with an array per collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub instructions: Vec<Instruction>,
    pub attendance: Vec<AttendanceRecord>,
    pub salaries: Vec<SalaryRecord>,
}

impl Snapshot {
    /// Parse a stored payload without ever failing.
    ///
    /// Invalid JSON or a non-object yields an empty snapshot. A collection
    /// that is missing or not an array is empty. Records that do not match
    /// their type are skipped.
    pub fn parse_lenient(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Stored snapshot is not valid JSON, starting empty");
                return Self::default();
            }
        };

        let Value::Object(mut fields) = value else {
            warn!("Stored snapshot is not a JSON object, starting empty");
            return Self::default();
        };

        Self {
            users: take_collection(&mut fields),
            tasks: take_collection(&mut fields),
            instructions: take_collection(&mut fields),
            attendance: take_collection(&mut fields),
            salaries: take_collection(&mut fields),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.tasks.is_empty()
            && self.instructions.is_empty()
            && self.attendance.is_empty()
            && self.salaries.is_empty()
    }
}

fn take_collection<T: Record>(fields: &mut Map<String, Value>) -> Vec<T> {
    let name = T::COLLECTION;
    let key: &str = name.as_ref();
    let items = match fields.remove(key) {
        None => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(collection = %name, "Stored collection is not an array, ignoring it");
            return Vec::new();
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection = %name, index, error = %e, "Skipping malformed stored record");
                None
            }
        })
        .collect();

    if records.len() != total {
        warn!(
            collection = %name,
            kept = records.len(),
            total,
            "Stored collection partially recovered"
        );
    }
    records
}

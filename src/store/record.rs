//! Typed view over the five collections.
//!
//! Each entity kind names its collection, the fields it can be matched on,
//! and how a partial update merges into it.

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::model::attendance::{AttendanceField, AttendancePatch, AttendanceRecord};
use crate::model::instruction::{Instruction, InstructionField, InstructionPatch};
use crate::model::salary::{SalaryField, SalaryPatch, SalaryRecord, net_salary};
use crate::model::task::{Task, TaskField, TaskPatch};
use crate::model::user::{User, UserField, UserPatch};
use crate::store::snapshot::Snapshot;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CollectionName {
    Users,
    Tasks,
    Instructions,
    Attendance,
    Salaries,
}

pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Fields usable as a match key in `remove_by` / `patch_by`
    type Field: Copy + Debug + Send + Sync;
    type Patch: Debug + Send + Sync;

    const COLLECTION: CollectionName;
    /// Field used by `remove` / `patch`
    const DEFAULT_FIELD: Self::Field;

    fn key(&self, field: Self::Field) -> &str;

    fn apply(&mut self, patch: &Self::Patch);

    fn items(snapshot: &Snapshot) -> &Vec<Self>;

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

fn merge<T: Clone>(slot: &mut T, update: &Option<T>) {
    if let Some(value) = update {
        *slot = value.clone();
    }
}

impl Record for User {
    type Field = UserField;
    type Patch = UserPatch;

    const COLLECTION: CollectionName = CollectionName::Users;
    const DEFAULT_FIELD: UserField = UserField::Id;

    fn key(&self, field: UserField) -> &str {
        match field {
            UserField::Id => &self.id,
            UserField::Email => &self.email,
        }
    }

    fn apply(&mut self, patch: &UserPatch) {
        merge(&mut self.name, &patch.name);
        merge(&mut self.email, &patch.email);
        if patch.avatar.is_some() {
            self.avatar = patch.avatar.clone();
        }
    }

    fn items(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.users
    }

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.users
    }
}

impl Record for Task {
    type Field = TaskField;
    type Patch = TaskPatch;

    const COLLECTION: CollectionName = CollectionName::Tasks;
    const DEFAULT_FIELD: TaskField = TaskField::Id;

    fn key(&self, field: TaskField) -> &str {
        match field {
            TaskField::Id => &self.id,
            TaskField::AssignedTo => &self.assigned_to,
        }
    }

    fn apply(&mut self, patch: &TaskPatch) {
        merge(&mut self.title, &patch.title);
        merge(&mut self.description, &patch.description);
        merge(&mut self.status, &patch.status);
        merge(&mut self.site_location, &patch.site_location);
    }

    fn items(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.tasks
    }

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.tasks
    }
}

impl Record for Instruction {
    type Field = InstructionField;
    type Patch = InstructionPatch;

    const COLLECTION: CollectionName = CollectionName::Instructions;
    const DEFAULT_FIELD: InstructionField = InstructionField::Id;

    fn key(&self, field: InstructionField) -> &str {
        match field {
            InstructionField::Id => &self.id,
        }
    }

    fn apply(&mut self, patch: &InstructionPatch) {
        merge(&mut self.content, &patch.content);
        merge(&mut self.priority, &patch.priority);
    }

    fn items(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.instructions
    }

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.instructions
    }
}

impl Record for AttendanceRecord {
    type Field = AttendanceField;
    type Patch = AttendancePatch;

    const COLLECTION: CollectionName = CollectionName::Attendance;
    const DEFAULT_FIELD: AttendanceField = AttendanceField::Id;

    fn key(&self, field: AttendanceField) -> &str {
        match field {
            AttendanceField::Id => &self.id,
            AttendanceField::EmployeeId => &self.employee_id,
        }
    }

    fn apply(&mut self, patch: &AttendancePatch) {
        if patch.check_out_time.is_some() {
            self.check_out_time = patch.check_out_time;
        }
        if patch.location.is_some() {
            self.location = patch.location;
        }
    }

    fn items(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.attendance
    }

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.attendance
    }
}

impl Record for SalaryRecord {
    type Field = SalaryField;
    type Patch = SalaryPatch;

    const COLLECTION: CollectionName = CollectionName::Salaries;
    // salaries have no id of their own
    const DEFAULT_FIELD: SalaryField = SalaryField::EmployeeId;

    fn key(&self, field: SalaryField) -> &str {
        match field {
            SalaryField::EmployeeId => &self.employee_id,
        }
    }

    fn apply(&mut self, patch: &SalaryPatch) {
        merge(&mut self.base, &patch.base);
        merge(&mut self.allowance, &patch.allowance);
        merge(&mut self.deduction, &patch.deduction);
        merge(&mut self.last_updated, &patch.last_updated);
        self.net = net_salary(self.base, self.allowance, self.deduction);
    }

    fn items(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.salaries
    }

    fn items_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.salaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use chrono::NaiveDate;
    use strum::IntoEnumIterator;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn collection_names_match_slot_fields() {
        let names: Vec<String> = CollectionName::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            ["users", "tasks", "instructions", "attendance", "salaries"]
        );
    }

    #[test]
    fn task_patch_only_touches_given_fields() {
        let mut task = Task {
            id: "t1".into(),
            title: "Foundation".into(),
            description: "Level ground".into(),
            assigned_to: "3".into(),
            assigned_to_name: "Amit".into(),
            status: TaskStatus::Pending,
            site_location: "Sector 45".into(),
            created_at: day(),
        };
        let before = task.clone();

        task.apply(&TaskPatch::status(TaskStatus::Completed));

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.site_location, before.site_location);
    }

    #[test]
    fn salary_patch_recomputes_net() {
        let mut record = SalaryRecord::new("3", 1000.0, 200.0, 50.0, day());
        assert_eq!(record.net, 1150.0);

        record.apply(&SalaryPatch {
            deduction: Some(150.0),
            ..Default::default()
        });

        assert_eq!(record.base, 1000.0);
        assert_eq!(record.net, 1050.0);
    }
}

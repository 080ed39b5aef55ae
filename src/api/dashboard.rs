//! Read side of the role dashboards.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::attendance::AttendanceRecord;
use crate::model::instruction::Instruction;
use crate::model::salary::SalaryRecord;
use crate::model::task::Task;
use crate::model::user::User;
use crate::store::CollectionStore;

/// Everything a dashboard renders, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortalView {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub instructions: Vec<Instruction>,
    pub attendance: Vec<AttendanceRecord>,
    pub salaries: Vec<SalaryRecord>,
}

impl PortalView {
    pub async fn load(store: &CollectionStore) -> Self {
        let (users, tasks, instructions, attendance, salaries) = futures::join!(
            store.read::<User>(),
            store.read::<Task>(),
            store.read::<Instruction>(),
            store.read::<AttendanceRecord>(),
            store.read::<SalaryRecord>(),
        );
        Self {
            users,
            tasks,
            instructions,
            attendance,
            salaries,
        }
    }

    /// Re-fetch after a change notification.
    pub async fn refresh(&mut self, store: &CollectionStore) {
        *self = Self::load(store).await;
    }

    pub fn employees(&self) -> impl Iterator<Item = &User> {
        super::employee::employees(&self.users)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn tasks_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| t.assigned_to == user_id)
    }

    /// The open record for today if there is one, else the latest closed one.
    pub fn attendance_on(&self, user_id: &str, day: NaiveDate) -> Option<&AttendanceRecord> {
        let mut today = self
            .attendance
            .iter()
            .filter(|a| a.employee_id == user_id && a.date == day);
        let first = today.next()?;
        if first.is_open() {
            return Some(first);
        }
        today.find(|a| a.is_open()).or(Some(first))
    }

    pub fn is_checked_in(&self, user_id: &str, day: NaiveDate) -> bool {
        self.attendance_on(user_id, day)
            .is_some_and(AttendanceRecord::is_open)
    }

    /// Number of distinct site locations on the task board
    pub fn live_sites(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| t.site_location.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn latest_instructions(&self, n: usize) -> &[Instruction] {
        &self.instructions[..n.min(self.instructions.len())]
    }

    pub fn salary_for(&self, employee_id: &str) -> Option<&SalaryRecord> {
        self.salaries.iter().find(|s| s.employee_id == employee_id)
    }

    /// Estimated monthly payroll: sum of every net salary on file.
    pub fn total_payroll(&self) -> f64 {
        self.salaries.iter().map(|s| s.net).sum()
    }

    /// Punch log, newest first.
    pub fn recent_attendance(&self, n: usize) -> &[AttendanceRecord] {
        &self.attendance[..n.min(self.attendance.len())]
    }
}

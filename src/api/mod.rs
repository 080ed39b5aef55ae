//! Portal actions performed by the role dashboards, on top of the store.
//!
//! No role checks happen here; any caller may run any action.

pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod instruction;
pub mod payroll;
pub mod task;

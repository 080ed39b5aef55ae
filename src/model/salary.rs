use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pay sheet for one employee. There is no record id; `employee_id` is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub employee_id: String,
    pub base: f64,
    pub allowance: f64,
    pub deduction: f64,
    pub net: f64,
    pub last_updated: NaiveDate,
}

impl SalaryRecord {
    pub fn new(
        employee_id: impl Into<String>,
        base: f64,
        allowance: f64,
        deduction: f64,
        last_updated: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            base,
            allowance,
            deduction,
            net: net_salary(base, allowance, deduction),
            last_updated,
        }
    }
}

pub fn net_salary(base: f64, allowance: f64, deduction: f64) -> f64 {
    base + allowance - deduction
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SalaryField {
    EmployeeId,
}

/// Partial pay update; `net` is always recomputed from the merged amounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryPatch {
    pub base: Option<f64>,
    pub allowance: Option<f64>,
    pub deduction: Option<f64>,
    pub last_updated: Option<NaiveDate>,
}

use chrono::NaiveDate;
use tracing::info;

use crate::error::PortalError;
use crate::model::salary::SalaryRecord;
use crate::model::user::User;
use crate::store::CollectionStore;

/// Pay components entered by HR
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalaryInput {
    pub base: f64,
    pub allowance: f64,
    pub deduction: f64,
}

impl SalaryInput {
    fn validate(&self) -> Result<(), PortalError> {
        for (field, value) in [
            ("base", self.base),
            ("allowance", self.allowance),
            ("deduction", self.deduction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PortalError::InvalidAmount { field, value });
            }
        }
        Ok(())
    }
}

impl From<&SalaryRecord> for SalaryInput {
    fn from(record: &SalaryRecord) -> Self {
        Self {
            base: record.base,
            allowance: record.allowance,
            deduction: record.deduction,
        }
    }
}

pub async fn salary_for(store: &CollectionStore, employee_id: &str) -> Option<SalaryRecord> {
    store
        .read::<SalaryRecord>()
        .await
        .into_iter()
        .find(|s| s.employee_id == employee_id)
}

/// Current figures for the pay form, zeros if none are on file.
pub async fn salary_form(store: &CollectionStore, employee_id: &str) -> SalaryInput {
    salary_for(store, employee_id)
        .await
        .map(|record| SalaryInput::from(&record))
        .unwrap_or_default()
}

/// Replace the employee's salary record with freshly computed figures.
///
/// The old record for this employee is dropped and the new one appended in a
/// single store mutation, so concurrent saves for other employees survive.
pub async fn save_salary(
    store: &CollectionStore,
    employee_id: &str,
    input: SalaryInput,
    today: NaiveDate,
) -> Result<SalaryRecord, PortalError> {
    input.validate()?;

    let users = store.read::<User>().await;
    if !users.iter().any(|u| u.id == employee_id) {
        return Err(PortalError::UnknownUser(employee_id.to_string()));
    }

    let record = SalaryRecord::new(employee_id, input.base, input.allowance, input.deduction, today);
    let saved = record.clone();
    store
        .update_with::<SalaryRecord, _>(move |salaries| {
            salaries.retain(|s| s.employee_id != employee_id);
            salaries.push(saved);
        })
        .await;

    info!(employee_id, net = record.net, "Salary saved");
    Ok(record)
}

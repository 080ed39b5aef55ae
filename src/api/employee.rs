use tracing::info;

use crate::error::PortalError;
use crate::model::role::Role;
use crate::model::salary::SalaryRecord;
use crate::model::user::User;
use crate::store::CollectionStore;
use crate::utils::id::new_id;

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Register a staff member. Newest staff come first in the roster.
pub async fn add_staff(store: &CollectionStore, staff: NewStaff) -> Result<User, PortalError> {
    let name = staff.name.trim();
    let email = staff.email.trim();
    if name.is_empty() {
        return Err(PortalError::EmptyField { field: "name" });
    }
    if email.is_empty() {
        return Err(PortalError::EmptyField { field: "email" });
    }

    let users = store.read::<User>().await;
    if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
        return Err(PortalError::DuplicateEmail(email.to_string()));
    }

    let user = User {
        id: new_id("usr"),
        name: name.to_string(),
        email: email.to_string(),
        role: staff.role,
        avatar: None,
    };
    let user = store.insert_front(user).await;

    info!(user_id = %user.id, role = %user.role, "Staff added");
    Ok(user)
}

/// Remove a staff member and their salary record.
pub async fn remove_staff(store: &CollectionStore, user_id: &str) {
    store.remove::<User>(user_id).await;
    store.remove::<SalaryRecord>(user_id).await;
    info!(user_id, "Staff removed");
}

pub fn employees(users: &[User]) -> impl Iterator<Item = &User> {
    users.iter().filter(|u| u.role.is_employee())
}

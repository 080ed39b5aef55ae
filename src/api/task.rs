use chrono::NaiveDate;
use tracing::info;

use crate::error::PortalError;
use crate::model::task::{Task, TaskField, TaskPatch, TaskStatus};
use crate::model::user::User;
use crate::store::CollectionStore;
use crate::utils::id::new_id;

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub site_location: String,
}

/// Publish a new assignment at the top of the task board.
pub async fn assign_task(
    store: &CollectionStore,
    new: NewTask,
    today: NaiveDate,
) -> Result<Task, PortalError> {
    if new.title.trim().is_empty() {
        return Err(PortalError::EmptyField { field: "title" });
    }

    let users = store.read::<User>().await;
    let assigned_to_name = users
        .iter()
        .find(|u| u.id == new.assigned_to)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let task = Task {
        id: new_id("t"),
        title: new.title.trim().to_string(),
        description: new.description,
        assigned_to: new.assigned_to,
        assigned_to_name,
        status: TaskStatus::Pending,
        site_location: new.site_location,
        created_at: today,
    };
    let task = store.insert_front(task).await;

    info!(task_id = %task.id, assigned_to = %task.assigned_to, "Task assigned");
    Ok(task)
}

pub async fn update_status(
    store: &CollectionStore,
    task_id: &str,
    status: TaskStatus,
) -> Result<(), PortalError> {
    let tasks = store.read::<Task>().await;
    if !tasks.iter().any(|t| t.id == task_id) {
        return Err(PortalError::UnknownTask(task_id.to_string()));
    }

    store.patch::<Task>(task_id, TaskPatch::status(status)).await;
    info!(task_id, %status, "Task status updated");
    Ok(())
}

/// Move every task of a worker to `status`, e.g. when a site closes.
pub async fn update_status_for_assignee(store: &CollectionStore, user_id: &str, status: TaskStatus) {
    store
        .patch_by::<Task>(user_id, TaskPatch::status(status), TaskField::AssignedTo)
        .await;
}

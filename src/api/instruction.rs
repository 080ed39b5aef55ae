use chrono::NaiveDate;
use tracing::info;

use crate::error::PortalError;
use crate::model::instruction::{Instruction, Priority};
use crate::model::user::User;
use crate::store::CollectionStore;
use crate::utils::id::new_id;

/// Send an instruction to all staff. Newest first.
pub async fn broadcast(
    store: &CollectionStore,
    author: &User,
    content: &str,
    priority: Priority,
    today: NaiveDate,
) -> Result<Instruction, PortalError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(PortalError::EmptyField { field: "content" });
    }

    let instruction = Instruction {
        id: new_id("ins"),
        author: author.name.clone(),
        content: content.to_string(),
        date: today,
        priority,
    };
    let instruction = store.insert_front(instruction).await;

    info!(instruction_id = %instruction.id, %priority, "Instruction broadcast");
    Ok(instruction)
}

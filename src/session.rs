//! Who is signed in on this device.
//!
//! Kept in its own slot, apart from the collections. The store never looks
//! at it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::SlotError;
use crate::model::user::User;
use crate::store::CollectionStore;
use crate::store::slot::DurableSlot;

#[derive(Debug, Clone)]
pub struct SessionStore {
    slot: Arc<dyn DurableSlot>,
}

impl SessionStore {
    pub fn new(slot: Arc<dyn DurableSlot>) -> Self {
        Self { slot }
    }

    pub fn save(&self, user: &User) -> Result<(), SlotError> {
        let payload = serde_json::to_string(user)?;
        self.slot.commit(&payload)?;
        info!(user_id = %user.id, "Session saved");
        Ok(())
    }

    /// The stored user, if any. Unreadable or corrupt sessions count as none.
    pub fn load(&self) -> Option<User> {
        let raw = match self.slot.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read session slot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt session");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), SlotError> {
        self.slot.clear()?;
        info!("Session cleared");
        Ok(())
    }

    /// Load the session and refresh it from the `users` collection.
    ///
    /// A session whose user no longer exists is cleared.
    pub async fn restore(&self, store: &CollectionStore) -> Option<User> {
        let saved = self.load()?;
        let current = store
            .read::<User>()
            .await
            .into_iter()
            .find(|u| u.id == saved.id);

        match current {
            Some(user) => {
                if user != saved {
                    if let Err(e) = self.save(&user) {
                        warn!(error = %e, "Failed to refresh stored session");
                    }
                }
                Some(user)
            }
            None => {
                info!(user_id = %saved.id, "Session user no longer exists");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "Failed to clear stale session");
                }
                None
            }
        }
    }
}

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::session::SessionStore;
use crate::store::CollectionStore;
use crate::store::slot::FileSlot;

pub fn init_store(config: &Config) -> CollectionStore {
    let mut slot = FileSlot::new(&config.store_path);
    if let Some(quota) = config.store_quota_bytes {
        slot = slot.with_quota(quota);
    }
    info!(path = %config.store_path.display(), "Opening collection store");
    CollectionStore::with_latency(Arc::new(slot), Arc::new(config.latency()))
}

pub fn init_session(config: &Config) -> SessionStore {
    SessionStore::new(Arc::new(FileSlot::new(&config.session_path)))
}

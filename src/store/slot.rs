//! Durable slots: the single place a serialized snapshot lives between runs.

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;

use crate::error::SlotError;

pub trait DurableSlot: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>, SlotError>;

    /// Replace the stored payload in one write.
    fn commit(&self, payload: &str) -> Result<(), SlotError>;

    fn clear(&self) -> Result<(), SlotError>;
}

fn check_quota(slot: &str, payload: &str, quota: Option<usize>) -> Result<(), SlotError> {
    match quota {
        Some(quota) if payload.len() > quota => Err(SlotError::QuotaExceeded {
            slot: slot.to_string(),
            size: payload.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

/// A JSON file on local disk. Commits go through a temp file in the same
/// directory and a rename, so readers never see a half-written payload.
#[derive(Debug, Clone)]
pub struct FileSlot {
    name: String,
    path: PathBuf,
    quota: Option<usize>,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path,
            quota: None,
        }
    }

    /// Reject payloads larger than `bytes`, like a browser storage quota.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl DurableSlot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::io(&self.name, e)),
        }
    }

    fn commit(&self, payload: &str) -> Result<(), SlotError> {
        check_quota(&self.name, payload, self.quota)?;

        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| SlotError::io(&self.name, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SlotError::io(&self.name, e))?;
        tmp.write_all(payload.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SlotError::io(&self.name, e))?;
        tmp.persist(&self.path)
            .map_err(|e| SlotError::io(&self.name, e.error))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlotError::io(&self.name, e)),
        }
    }
}

/// Process-local slot. Can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemorySlot {
    name: String,
    value: Mutex<Option<String>>,
    reject_writes: AtomicBool,
    quota: Option<usize>,
}

impl MemorySlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Start with `payload` already stored
    pub fn with_payload(name: impl Into<String>, payload: impl Into<String>) -> Self {
        let slot = Self::new(name);
        *slot.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.into());
        slot
    }

    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn contents(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DurableSlot for MemorySlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Option<String>, SlotError> {
        Ok(self.contents())
    }

    fn commit(&self, payload: &str) -> Result<(), SlotError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(SlotError::WriteRejected {
                slot: self.name.clone(),
            });
        }
        check_quota(&self.name, payload, self.quota)?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

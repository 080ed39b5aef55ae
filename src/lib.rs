//! Data layer of the VJ Gote site portal.
//!
//! A [`store::CollectionStore`] holds users, tasks, instructions, attendance
//! and salaries, persists them to a local slot and notifies subscribers on
//! every change. The `api` module builds the dashboard actions on top.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod seed;
pub mod session;
pub mod store;
pub mod utils;

pub use error::{PortalError, SlotError};
pub use store::CollectionStore;
pub use store::listeners::Subscription;

//! Storage layer
//!
//! Handles the persistence slots the store serializes itself into.
//!
//! ## Architecture
//!
//! - **Slots**: named text values in a key-value backend ([`StateStorage`])
//! - **Errors**: typed [`StorageError`]s, logged by the store and never
//!   surfaced through its mutation API

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{validate_slot_name, FileStorage, MemoryStorage, StateStorage};

//! Bookshelf Core Library
//!
//! This crate provides the core functionality for Bookshelf, a local-first
//! personal book collection with reading notes.
//!
//! # Architecture
//!
//! - **Store**: single source of truth, held in memory
//! - **Slot storage**: the whole collection is written as one JSON document
//!   to a named slot after every mutation
//!
//! All queries are served directly from the in-memory state.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a book
//! let book = store.add_book(NewBook::new("Dune", "Frank Herbert", BookCategory::SciFi, 412));
//! store.update_reading_progress(&book.id, 412);
//!
//! // Query books
//! let finished = store.get_books_by_status(ReadingStatus::Finished);
//! ```
//!
//! # Modules
//!
//! - `store`: State container (main entry point)
//! - `models`: Books, reading notes, categories and statuses
//! - `state`: Collection state and its persisted document form
//! - `seed`: Starter collection
//! - `stats`: Derived reading statistics
//! - `storage`: Persistence slots
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod seed;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{Book, BookCategory, BookUpdate, NewBook, ParseError, ReadingNote, ReadingStatus};
pub use state::BookshelfState;
pub use stats::{CategoryCount, ReadingStats};
pub use storage::{FileStorage, MemoryStorage, StateStorage, StorageError, StorageResult};
pub use store::{Snapshot, Store, SubscriptionId};

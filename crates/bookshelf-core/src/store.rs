//! Book collection store
//!
//! The `Store` is the single source of truth for books and reading notes.
//! All reads and writes go through it, and it persists itself after every
//! mutation.
//!
//! ## Semantics
//!
//! - Mutations never fail. An unknown id is a silent no-op.
//! - In-memory state changes first; the durable write follows and a write
//!   failure is logged, never returned.
//! - Subscribed listeners receive the new immutable snapshot after every
//!   mutation, in subscription order.
//!
//! ## Known inconsistency
//!
//! `update_reading_progress` and `update_status` both write `status` and
//! are not reconciled with each other: `update_status` leaves `current_page`
//! alone, so a book can be finished with pages left, or reading with every
//! page read.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads the stored collection or the starter books
//!
//! let book = store.add_book(NewBook::new("Dune", "Frank Herbert", BookCategory::SciFi, 412));
//! store.update_reading_progress(&book.id, 120);
//!
//! let sci_fi = store.get_books_by_category(BookCategory::SciFi);
//! ```

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    new_id, now_millis, Book, BookCategory, BookUpdate, NewBook, ReadingNote, ReadingStatus,
};
use crate::state::BookshelfState;
use crate::stats::ReadingStats;
use crate::storage::{FileStorage, StateStorage, StorageResult};

/// Immutable view of the collection at one point in time
pub type Snapshot = Arc<BookshelfState>;

type Listener = Box<dyn FnMut(&Snapshot)>;

/// Handle returned by [`Store::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// State container for the book collection
pub struct Store {
    /// Current snapshot; replaced copy-on-write by mutations
    state: Snapshot,
    /// Persistence backend
    storage: Box<dyn StateStorage>,
    /// Slot the collection is stored under
    store_name: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("store_name", &self.store_name)
            .field("books", &self.state.books.len())
            .field("notes", &self.state.notes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    /// Open the store from the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the store backed by files in the configured data directory
    pub fn open_with_config(config: &Config) -> Self {
        Self::with_storage(FileStorage::from_config(config), config.store_name.clone())
    }

    /// Create a store over any slot backend, loading the slot `store_name`
    ///
    /// A missing, unreadable or unparsable slot yields the starter books.
    pub fn with_storage(storage: impl StateStorage + 'static, store_name: impl Into<String>) -> Self {
        let store_name = store_name.into();
        let state = load_state(&storage, &store_name);

        Self {
            state: Arc::new(state),
            storage: Box::new(storage),
            store_name,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Name of the persistence slot
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    // ==================== Snapshots ====================

    /// The current snapshot
    ///
    /// Cheap to clone and never changes; later mutations produce new snapshots.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state)
    }

    /// All books, newest first
    pub fn books(&self) -> &[Book] {
        &self.state.books
    }

    /// All notes, newest first
    pub fn notes(&self) -> &[ReadingNote] {
        &self.state.notes
    }

    /// Register a listener called with each new snapshot
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // ==================== Book Operations ====================

    /// Add a new book at the front of the collection
    ///
    /// Assigns a fresh id and stamps the date added. Field values are not
    /// validated.
    pub fn add_book(&mut self, data: NewBook) -> Book {
        let book = Book::from_new(new_id(), data, now_millis());
        debug!(id = %book.id, title = %book.title, "Adding book");

        let created = book.clone();
        self.apply(|state| state.books.insert(0, book));
        created
    }

    /// Merge the present fields of `update` onto a book
    pub fn update_book(&mut self, id: &str, update: BookUpdate) {
        self.apply(|state| {
            if let Some(book) = state.book_mut(id) {
                update.apply_to(book);
            }
        });
    }

    /// Delete a book and every note attached to it
    pub fn delete_book(&mut self, id: &str) {
        self.apply(|state| {
            state.books.retain(|b| b.id != id);
            state.notes.retain(|n| n.book_id != id);
        });
    }

    /// Record the page reached in a book
    ///
    /// Reaching the last page marks the book finished and stamps the finish
    /// date, every time, even if it was already finished. Anything short of
    /// the last page marks it as reading and leaves the finish date alone.
    pub fn update_reading_progress(&mut self, id: &str, current_page: u32) {
        let now = now_millis();
        self.apply(|state| {
            if let Some(book) = state.book_mut(id) {
                book.current_page = Some(current_page);
                if current_page >= book.pages {
                    book.status = ReadingStatus::Finished;
                    book.date_finished = Some(now);
                } else {
                    book.status = ReadingStatus::Reading;
                }
            }
        });
    }

    /// Set a book's status directly
    ///
    /// Finished stamps the finish date; any other status clears it. The
    /// current page is left as is.
    pub fn update_status(&mut self, id: &str, status: ReadingStatus) {
        let now = now_millis();
        self.apply(|state| {
            if let Some(book) = state.book_mut(id) {
                book.status = status;
                book.date_finished = match status {
                    ReadingStatus::Finished => Some(now),
                    _ => None,
                };
            }
        });
    }

    /// Set a book's rating (range not checked)
    pub fn rate_book(&mut self, id: &str, rating: u8) {
        self.apply(|state| {
            if let Some(book) = state.book_mut(id) {
                book.rating = Some(rating);
            }
        });
    }

    /// Get a book by ID
    pub fn get_book_by_id(&self, id: &str) -> Option<Book> {
        self.state.book(id).cloned()
    }

    /// Get books in a category, in collection order
    pub fn get_books_by_category(&self, category: BookCategory) -> Vec<Book> {
        self.state.books_in_category(category).cloned().collect()
    }

    /// Get books with a reading status, in collection order
    pub fn get_books_by_status(&self, status: ReadingStatus) -> Vec<Book> {
        self.state.books_with_status(status).cloned().collect()
    }

    // ==================== Note Operations ====================

    /// Add a note at the front of the note list
    ///
    /// The book id is not checked against the collection.
    pub fn add_note(
        &mut self,
        book_id: &str,
        content: impl Into<String>,
        page: Option<u32>,
    ) -> ReadingNote {
        let note = ReadingNote::new(book_id, content, page);
        debug!(id = %note.id, book_id = %note.book_id, "Adding note");

        let created = note.clone();
        self.apply(|state| state.notes.insert(0, note));
        created
    }

    /// Delete a note
    pub fn delete_note(&mut self, note_id: &str) {
        self.apply(|state| state.notes.retain(|n| n.id != note_id));
    }

    /// Get notes attached to a book, in collection order
    pub fn get_notes_by_book_id(&self, book_id: &str) -> Vec<ReadingNote> {
        self.state.notes_for_book(book_id).cloned().collect()
    }

    // ==================== Stats ====================

    /// Summary statistics over the current collection
    pub fn reading_stats(&self) -> ReadingStats {
        ReadingStats::from_state(&self.state)
    }

    // ==================== Persistence ====================

    /// Write the current state to the slot, returning any storage error
    ///
    /// Mutations call this internally and only log failures.
    pub fn flush(&self) -> StorageResult<()> {
        let document = self.state.to_document()?;
        self.storage.set_item(&self.store_name, &document)
    }

    /// Apply a state change, then persist and notify
    ///
    /// Every mutation commits, even when nothing matched, so listeners and
    /// storage see each call.
    fn apply(&mut self, change: impl FnOnce(&mut BookshelfState)) {
        change(Arc::make_mut(&mut self.state));

        if let Err(e) = self.flush() {
            warn!(
                store = %self.store_name,
                error = %e,
                suggestion = e.recovery_suggestion().unwrap_or("none"),
                "Failed to persist collection, keeping in-memory state"
            );
        }

        let snapshot = Arc::clone(&self.state);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

/// Load the collection from a slot, falling back to the starter books
fn load_state(storage: &dyn StateStorage, store_name: &str) -> BookshelfState {
    let now = now_millis();

    match storage.get_item(store_name) {
        Ok(Some(text)) => match BookshelfState::from_document(store_name, &text, now) {
            Ok(state) => {
                debug!(
                    store = %store_name,
                    books = state.books.len(),
                    notes = state.notes.len(),
                    "Loaded stored collection"
                );
                state
            }
            Err(e) => {
                warn!(
                    store = %store_name,
                    error = %e,
                    corrupt = e.is_corrupt_state(),
                    suggestion = e.recovery_suggestion().unwrap_or("none"),
                    "Stored collection unusable, loading starter books"
                );
                BookshelfState::seeded(now)
            }
        },
        Ok(None) => {
            debug!(store = %store_name, "No stored collection, loading starter books");
            BookshelfState::seeded(now)
        }
        Err(e) => {
            warn!(
                store = %store_name,
                error = %e,
                suggestion = e.recovery_suggestion().unwrap_or("none"),
                "Failed to read stored collection, loading starter books"
            );
            BookshelfState::seeded(now)
        }
    }
}

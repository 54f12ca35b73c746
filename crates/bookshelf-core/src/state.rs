//! Collection state and its persisted document form
//!
//! The whole state is stored as one JSON document:
//!
//! ```json
//! { "state": { "books": [...], "notes": [...] }, "version": 0 }
//! ```
//!
//! Both sequences are newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Book, BookCategory, ReadingNote, ReadingStatus};
use crate::seed::seed_books;
use crate::storage::{StorageError, StorageResult};

/// Version written into the persisted document
pub const STATE_VERSION: u32 = 0;

/// The books and notes held by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookshelfState {
    pub books: Vec<Book>,
    pub notes: Vec<ReadingNote>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    state: &'a BookshelfState,
    version: u32,
}

#[derive(Deserialize)]
struct StoredDocument {
    state: StoredState,
    #[serde(default)]
    version: u32,
}

/// Persisted state before defaults are merged in
#[derive(Deserialize)]
struct StoredState {
    #[serde(default)]
    books: Option<Vec<Book>>,
    #[serde(default)]
    notes: Option<Vec<ReadingNote>>,
}

impl BookshelfState {
    /// The starter collection: six sample books, no notes
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            books: seed_books(now),
            notes: Vec::new(),
        }
    }

    /// First book with the given id
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub(crate) fn book_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Books in a category, in store order
    pub fn books_in_category(&self, category: BookCategory) -> impl Iterator<Item = &Book> + '_ {
        self.books.iter().filter(move |b| b.category == category)
    }

    /// Books with a reading status, in store order
    pub fn books_with_status(&self, status: ReadingStatus) -> impl Iterator<Item = &Book> + '_ {
        self.books.iter().filter(move |b| b.status == status)
    }

    /// Notes attached to a book, in store order
    pub fn notes_for_book<'a>(&'a self, book_id: &'a str) -> impl Iterator<Item = &'a ReadingNote> {
        self.notes.iter().filter(move |n| n.book_id == book_id)
    }

    /// Serialize into the persisted document form
    pub fn to_document(&self) -> StorageResult<String> {
        let doc = DocumentRef {
            state: self,
            version: STATE_VERSION,
        };
        Ok(serde_json::to_string(&doc)?)
    }

    /// Parse a persisted document read from `slot`
    ///
    /// A document without a `books` key keeps the starter books (built
    /// relative to `now`); one without `notes` has no notes.
    pub fn from_document(slot: &str, text: &str, now: DateTime<Utc>) -> StorageResult<Self> {
        let doc: StoredDocument =
            serde_json::from_str(text).map_err(|e| StorageError::InvalidFormat {
                slot: slot.to_string(),
                details: e.to_string(),
            })?;

        if doc.version != STATE_VERSION {
            return Err(StorageError::UnsupportedVersion {
                slot: slot.to_string(),
                found: doc.version,
                expected: STATE_VERSION,
            });
        }

        Ok(Self {
            books: doc.state.books.unwrap_or_else(|| seed_books(now)),
            notes: doc.state.notes.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now_millis, NewBook};

    fn sample_state() -> BookshelfState {
        let now = now_millis();
        let mut state = BookshelfState::seeded(now);
        let mut extra = Book::from_new(
            "extra".to_string(),
            NewBook::new("Dune", "Frank Herbert", BookCategory::SciFi, 412)
                .with_description("Spice.")
                .with_rating(5),
            now,
        );
        extra.current_page = Some(12);
        state.books.insert(0, extra);
        state.notes.push(ReadingNote::new("extra", "Fear is the mind-killer", Some(8)));
        state.notes.push(ReadingNote::new("2", "Scout", None));
        state
    }

    #[test]
    fn test_document_round_trip() {
        let state = sample_state();
        let text = state.to_document().unwrap();
        let loaded = BookshelfState::from_document("slot", &text, now_millis()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_document_envelope() {
        let state = sample_state();
        let text = state.to_document().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["books"].as_array().unwrap().len(), 7);
        assert_eq!(value["state"]["notes"].as_array().unwrap().len(), 2);
        assert_eq!(value["state"]["notes"][0]["bookId"], "extra");
    }

    #[test]
    fn test_invalid_json_is_invalid_format() {
        let err = BookshelfState::from_document("slot", "{not json", now_millis()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_wrong_shape_is_invalid_format() {
        let err =
            BookshelfState::from_document("slot", r#"{"books": []}"#, now_millis()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));

        let err = BookshelfState::from_document(
            "slot",
            r#"{"state": {"books": [{"id": "1"}]}, "version": 0}"#,
            now_millis(),
        )
        .unwrap_err();
        assert!(err.is_corrupt_state());
    }

    #[test]
    fn test_foreign_version_rejected() {
        let err = BookshelfState::from_document(
            "slot",
            r#"{"state": {"books": [], "notes": []}, "version": 2}"#,
            now_millis(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 2, .. }
        ));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let state = BookshelfState::from_document(
            "slot",
            r#"{"state": {"notes": []}, "version": 0}"#,
            now_millis(),
        )
        .unwrap();
        assert_eq!(state.books.len(), 6);

        let state = BookshelfState::from_document(
            "slot",
            r#"{"state": {"books": []}, "version": 0}"#,
            now_millis(),
        )
        .unwrap();
        assert!(state.books.is_empty());
        assert!(state.notes.is_empty());
    }

    #[test]
    fn test_empty_collection_is_kept() {
        let state = BookshelfState::default();
        let text = state.to_document().unwrap();
        let loaded = BookshelfState::from_document("slot", &text, now_millis()).unwrap();
        assert!(loaded.books.is_empty());
    }

    #[test]
    fn test_lookups() {
        let state = sample_state();
        assert_eq!(state.book("3").unwrap().title, "1984");
        assert!(state.book("missing").is_none());

        let fiction: Vec<_> = state
            .books_in_category(BookCategory::Fiction)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(fiction, vec!["1", "2"]);

        let reading: Vec<_> = state
            .books_with_status(ReadingStatus::Reading)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(reading, vec!["2", "5"]);

        assert_eq!(state.notes_for_book("extra").count(), 1);
        assert_eq!(state.notes_for_book("4").count(), 0);
    }
}

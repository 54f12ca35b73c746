//! Command handlers

pub mod book;
pub mod category;
pub mod config;
pub mod note;
pub mod stats;

use anyhow::{bail, Result};

use bookshelf_core::Store;

/// Resolve a book ID (supports full ID or unique prefix)
pub fn resolve_book_id(store: &Store, id: &str) -> Result<String> {
    let candidates = store
        .books()
        .iter()
        .map(|b| (b.id.as_str(), b.title.as_str()));
    resolve_id(candidates, id, "book")
}

/// Resolve a note ID (supports full ID or unique prefix)
pub fn resolve_note_id(store: &Store, id: &str) -> Result<String> {
    let candidates = store
        .notes()
        .iter()
        .map(|n| (n.id.as_str(), n.content.as_str()));
    resolve_id(candidates, id, "note")
}

/// Match `id` against `(id, label)` pairs
///
/// An exact match wins over prefix matches.
fn resolve_id<'a>(
    candidates: impl Iterator<Item = (&'a str, &'a str)>,
    id: &str,
    kind: &str,
) -> Result<String> {
    if id.is_empty() {
        bail!("Empty {} ID", kind);
    }

    let mut matches = Vec::new();
    for (candidate, label) in candidates {
        if candidate == id {
            return Ok(candidate.to_string());
        }
        if candidate.starts_with(id) {
            matches.push((candidate, label));
        }
    }

    match matches.len() {
        0 => bail!("No {} found matching: {}", kind, id),
        1 => Ok(matches[0].0.to_string()),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for (candidate, label) in &matches {
                eprintln!("  {} - {}", candidate, label);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::seed::seed_books;
    use bookshelf_core::{BookCategory, BookshelfState, MemoryStorage, NewBook, StateStorage};
    use chrono::Utc;

    fn seeded_store() -> Store {
        Store::with_storage(MemoryStorage::new(), "test-store")
    }

    #[test]
    fn test_resolve_exact_book_id() {
        let store = seeded_store();
        assert_eq!(resolve_book_id(&store, "3").unwrap(), "3");
    }

    #[test]
    fn test_resolve_book_prefix() {
        let mut store = seeded_store();
        let book = store.add_book(NewBook::new("Dune", "Frank Herbert", BookCategory::SciFi, 412));

        let prefix = &book.id[..8];
        assert_eq!(resolve_book_id(&store, prefix).unwrap(), book.id);
    }

    #[test]
    fn test_resolve_unknown_book() {
        let store = seeded_store();
        let err = resolve_book_id(&store, "zzz").unwrap_err();
        assert!(err.to_string().contains("No book found"));
        assert!(resolve_book_id(&store, "").is_err());
    }

    #[test]
    fn test_exact_match_beats_prefix() {
        let storage = MemoryStorage::new();
        let mut state = BookshelfState::default();
        let mut books = seed_books(Utc::now());
        books[0].id = "ab".to_string();
        books[1].id = "abc".to_string();
        state.books = books;
        storage
            .set_item("test-store", &state.to_document().unwrap())
            .unwrap();

        let store = Store::with_storage(storage, "test-store");
        assert_eq!(resolve_book_id(&store, "ab").unwrap(), "ab");
        assert_eq!(resolve_book_id(&store, "abc").unwrap(), "abc");
    }

    #[test]
    fn test_ambiguous_prefix() {
        let storage = MemoryStorage::new();
        let mut state = BookshelfState::default();
        let mut books = seed_books(Utc::now());
        books[0].id = "abc1".to_string();
        books[1].id = "abc2".to_string();
        state.books = books;
        storage
            .set_item("test-store", &state.to_document().unwrap())
            .unwrap();

        let store = Store::with_storage(storage, "test-store");
        let err = resolve_book_id(&store, "abc").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_resolve_note_prefix() {
        let mut store = seeded_store();
        let note = store.add_note("1", "Great opening line", Some(1));

        assert_eq!(resolve_note_id(&store, &note.id[..6]).unwrap(), note.id);
        assert!(resolve_note_id(&store, "zzz").is_err());
    }
}

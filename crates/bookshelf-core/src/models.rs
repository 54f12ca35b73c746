//! Data models for Bookshelf
//!
//! Defines the core data structures: Book, ReadingNote, and the closed
//! category and reading-status enumerations.
//! Field names and timestamp encoding follow the persisted JSON document:
//! camelCase keys, absent optionals omitted, timestamps as epoch milliseconds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Cover color used when a new book doesn't specify one
pub const DEFAULT_COVER_COLOR: &str = "#8B4513";

/// Current time truncated to millisecond precision
///
/// Timestamps are persisted as epoch milliseconds, so in-memory values carry
/// the same precision and survive a save/load cycle unchanged.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Allocate a new opaque identifier for a book or note
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Errors from parsing category or status tokens
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown category '{0}'. Valid categories: fiction, non-fiction, mystery, sci-fi, biography")]
    UnknownCategory(String),

    #[error("Unknown reading status '{0}'. Valid statuses: want-to-read, reading, finished")]
    UnknownStatus(String),
}

/// Book category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookCategory {
    Fiction,
    NonFiction,
    Mystery,
    SciFi,
    Biography,
}

impl BookCategory {
    /// All categories in display order
    pub const ALL: [BookCategory; 5] = [
        BookCategory::Fiction,
        BookCategory::NonFiction,
        BookCategory::Mystery,
        BookCategory::SciFi,
        BookCategory::Biography,
    ];

    /// The wire token, as stored in the persisted document
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Fiction => "fiction",
            BookCategory::NonFiction => "non-fiction",
            BookCategory::Mystery => "mystery",
            BookCategory::SciFi => "sci-fi",
            BookCategory::Biography => "biography",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            BookCategory::Fiction => "Fiction",
            BookCategory::NonFiction => "Non-Fiction",
            BookCategory::Mystery => "Mystery",
            BookCategory::SciFi => "Sci-Fi",
            BookCategory::Biography => "Biography",
        }
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        BookCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

/// Reading status of a book
///
/// There is no enforced transition graph: any operation may set any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Finished,
}

impl ReadingStatus {
    /// All statuses in display order
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::WantToRead,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
    ];

    /// The wire token, as stored in the persisted document
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want-to-read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "Want to Read",
            ReadingStatus::Reading => "Reading",
            ReadingStatus::Finished => "Finished",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        ReadingStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == token)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// A book in the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, immutable once assigned
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: BookCategory,
    /// Display-only color token
    pub cover_color: String,
    /// Total page count
    pub pages: u32,
    pub description: String,
    /// Star rating, nominally 1-5 (not validated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub status: ReadingStatus,
    /// Present once reading has started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    /// When this book was added to the collection
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: DateTime<Utc>,
    /// When this book was last marked finished
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub date_finished: Option<DateTime<Utc>>,
}

impl Book {
    /// Build a book from creation input, stamping id and date added
    pub(crate) fn from_new(id: String, data: NewBook, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            category: data.category,
            cover_color: data.cover_color,
            pages: data.pages,
            description: data.description,
            rating: data.rating,
            status: data.status,
            current_page: data.current_page,
            date_added,
            date_finished: data.date_finished,
        }
    }

    /// Reading progress as a rounded percentage of total pages
    ///
    /// Returns 0 when no page has been recorded. Not clamped: a current page
    /// beyond the page count yields more than 100.
    pub fn progress_percentage(&self) -> u32 {
        match self.current_page {
            Some(current) if current > 0 && self.pages > 0 => {
                (f64::from(current) / f64::from(self.pages) * 100.0).round() as u32
            }
            _ => 0,
        }
    }

    /// Whether the book is marked finished
    pub fn is_finished(&self) -> bool {
        self.status == ReadingStatus::Finished
    }
}

/// Input for creating a book: every field except `id` and `date_added`
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: BookCategory,
    pub cover_color: String,
    pub pages: u32,
    pub description: String,
    pub rating: Option<u8>,
    pub status: ReadingStatus,
    pub current_page: Option<u32>,
    pub date_finished: Option<DateTime<Utc>>,
}

impl NewBook {
    /// Create input for an unread book with default cover and no description
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: BookCategory,
        pages: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category,
            cover_color: DEFAULT_COVER_COLOR.to_string(),
            pages,
            description: String::new(),
            rating: None,
            status: ReadingStatus::WantToRead,
            current_page: None,
            date_finished: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cover_color(mut self, color: impl Into<String>) -> Self {
        self.cover_color = color.into();
        self
    }

    pub fn with_status(mut self, status: ReadingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_current_page(mut self, page: u32) -> Self {
        self.current_page = Some(page);
        self
    }
}

/// Partial update merged onto an existing book
///
/// `None` leaves a field untouched. Optional book fields take a nested
/// option so they can be cleared with `Some(None)`. Identity and date added
/// are not updatable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<BookCategory>,
    pub cover_color: Option<String>,
    pub pages: Option<u32>,
    pub description: Option<String>,
    pub rating: Option<Option<u8>>,
    pub status: Option<ReadingStatus>,
    pub current_page: Option<Option<u32>>,
    pub date_finished: Option<Option<DateTime<Utc>>>,
}

impl BookUpdate {
    /// True if the update carries no fields
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the present fields onto `book`
    ///
    /// A plain field merge: status and date finished are not reconciled.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
        if let Some(category) = self.category {
            book.category = category;
        }
        if let Some(ref color) = self.cover_color {
            book.cover_color = color.clone();
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(ref description) = self.description {
            book.description = description.clone();
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
        if let Some(current_page) = self.current_page {
            book.current_page = current_page;
        }
        if let Some(date_finished) = self.date_finished {
            book.date_finished = date_finished;
        }
    }
}

/// A reading note attached to a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingNote {
    /// Unique identifier
    pub id: String,
    /// The book this note refers to (not checked on creation)
    pub book_id: String,
    pub content: String,
    /// Page the note refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ReadingNote {
    /// Create a note with a fresh id, stamped now
    pub fn new(book_id: impl Into<String>, content: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            id: new_id(),
            book_id: book_id.into(),
            content: content.into(),
            page,
            created_at: now_millis(),
        }
    }
}

//! Starter collection
//!
//! Loaded whenever there is no usable persisted state. Timestamps are
//! relative to the moment the seed is built.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Book, BookCategory, ReadingStatus};

/// Number of books in the starter collection
pub const SEED_BOOK_COUNT: usize = 6;

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

#[allow(clippy::too_many_arguments)]
fn book(
    id: &str,
    title: &str,
    author: &str,
    category: BookCategory,
    cover_color: &str,
    pages: u32,
    description: &str,
    status: ReadingStatus,
    date_added: DateTime<Utc>,
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category,
        cover_color: cover_color.to_string(),
        pages,
        description: description.to_string(),
        rating: None,
        status,
        current_page: None,
        date_added,
        date_finished: None,
    }
}

/// Build the six starter books, ids `1` through `6` in that order
pub fn seed_books(now: DateTime<Utc>) -> Vec<Book> {
    vec![
        Book {
            rating: Some(5),
            current_page: Some(180),
            date_finished: Some(days_ago(now, 15)),
            ..book(
                "1",
                "The Great Gatsby",
                "F. Scott Fitzgerald",
                BookCategory::Fiction,
                "#4A90E2",
                180,
                "A classic American novel set in the Jazz Age, exploring themes of wealth, love, and the American Dream.",
                ReadingStatus::Finished,
                days_ago(now, 30),
            )
        },
        Book {
            rating: Some(5),
            current_page: Some(156),
            ..book(
                "2",
                "To Kill a Mockingbird",
                "Harper Lee",
                BookCategory::Fiction,
                "#E25D5D",
                324,
                "A gripping tale of racial injustice and childhood innocence in the American South.",
                ReadingStatus::Reading,
                days_ago(now, 10),
            )
        },
        book(
            "3",
            "1984",
            "George Orwell",
            BookCategory::SciFi,
            "#2C3E50",
            328,
            "A dystopian social science fiction novel and cautionary tale about totalitarianism.",
            ReadingStatus::WantToRead,
            days_ago(now, 5),
        ),
        Book {
            rating: Some(4),
            current_page: Some(443),
            date_finished: Some(days_ago(now, 40)),
            ..book(
                "4",
                "Sapiens",
                "Yuval Noah Harari",
                BookCategory::NonFiction,
                "#F39C12",
                443,
                "A brief history of humankind, exploring how Homo sapiens came to dominate the world.",
                ReadingStatus::Finished,
                days_ago(now, 60),
            )
        },
        Book {
            rating: Some(4),
            current_page: Some(234),
            ..book(
                "5",
                "The Da Vinci Code",
                "Dan Brown",
                BookCategory::Mystery,
                "#8E44AD",
                454,
                "A mystery thriller involving secret societies and hidden codes.",
                ReadingStatus::Reading,
                days_ago(now, 20),
            )
        },
        book(
            "6",
            "Steve Jobs",
            "Walter Isaacson",
            BookCategory::Biography,
            "#95A5A6",
            656,
            "The authorized biography of Apple co-founder Steve Jobs.",
            ReadingStatus::WantToRead,
            days_ago(now, 2),
        ),
    ]
}

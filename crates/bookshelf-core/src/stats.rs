//! Reading statistics derived from the collection

use serde::Serialize;

use crate::models::{BookCategory, ReadingStatus};
use crate::state::BookshelfState;

/// Number of books in one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: BookCategory,
    pub count: usize,
}

/// Summary of the collection for the profile view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingStats {
    pub total_books: usize,
    pub want_to_read: usize,
    pub reading: usize,
    pub finished: usize,
    pub total_notes: usize,
    /// Full page count of finished books plus current page of books in progress
    pub pages_read: u64,
    /// Mean over rated books; `None` when nothing is rated
    pub average_rating: Option<f64>,
    /// One entry per category, in display order, including empty ones
    pub by_category: Vec<CategoryCount>,
}

impl ReadingStats {
    pub fn from_state(state: &BookshelfState) -> Self {
        let count_status = |status: ReadingStatus| state.books_with_status(status).count();

        let pages_read = state
            .books
            .iter()
            .map(|book| match book.status {
                ReadingStatus::Finished => u64::from(book.pages),
                ReadingStatus::Reading => u64::from(book.current_page.unwrap_or(0)),
                ReadingStatus::WantToRead => 0,
            })
            .sum();

        let ratings: Vec<f64> = state
            .books
            .iter()
            .filter_map(|book| book.rating)
            .map(f64::from)
            .collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        let by_category = BookCategory::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: state.books_in_category(category).count(),
            })
            .collect();

        Self {
            total_books: state.books.len(),
            want_to_read: count_status(ReadingStatus::WantToRead),
            reading: count_status(ReadingStatus::Reading),
            finished: count_status(ReadingStatus::Finished),
            total_notes: state.notes.len(),
            pages_read,
            average_rating,
            by_category,
        }
    }

    /// Count for a single category
    pub fn category_count(&self, category: BookCategory) -> usize {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now_millis, ReadingNote};

    #[test]
    fn test_seed_stats() {
        let state = BookshelfState::seeded(now_millis());
        let stats = ReadingStats::from_state(&state);

        assert_eq!(stats.total_books, 6);
        assert_eq!(stats.want_to_read, 2);
        assert_eq!(stats.reading, 2);
        assert_eq!(stats.finished, 2);
        assert_eq!(stats.total_notes, 0);
        // 180 + 443 finished, 156 + 234 in progress
        assert_eq!(stats.pages_read, 180 + 443 + 156 + 234);
        // Ratings 5, 5, 4, 4
        assert_eq!(stats.average_rating, Some(4.5));
        assert_eq!(stats.category_count(BookCategory::Fiction), 2);
        assert_eq!(stats.category_count(BookCategory::Biography), 1);
        assert_eq!(stats.by_category.len(), BookCategory::ALL.len());
    }

    #[test]
    fn test_empty_stats() {
        let stats = ReadingStats::from_state(&BookshelfState::default());
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.pages_read, 0);
        assert!(stats.average_rating.is_none());
        assert!(stats.by_category.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_notes_counted() {
        let mut state = BookshelfState::default();
        state.notes.push(ReadingNote::new("1", "a", None));
        state.notes.push(ReadingNote::new("orphan", "b", Some(2)));
        assert_eq!(ReadingStats::from_state(&state).total_notes, 2);
    }
}

//! Book command handlers

use anyhow::{anyhow, Context, Result};
use clap::Args;

use bookshelf_core::{Book, BookCategory, BookUpdate, NewBook, ReadingStatus, Store};

use crate::commands::resolve_book_id;
use crate::output::{short_id, Output};
use crate::prompt::{confirm, prompt_with_default};

/// Fields for a new book
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Book title
    pub title: String,
    /// Author name
    #[arg(short, long)]
    pub author: String,
    /// Category (fiction, non-fiction, mystery, sci-fi, biography)
    #[arg(short, long)]
    pub category: BookCategory,
    /// Total page count
    #[arg(short, long)]
    pub pages: u32,
    /// Short description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Cover color (e.g. "#2E86AB")
    #[arg(long)]
    pub color: Option<String>,
    /// Initial reading status (want-to-read, reading, finished)
    #[arg(short, long, default_value = "want-to-read")]
    pub status: ReadingStatus,
}

/// Fields that `book edit` can change
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New author
    #[arg(long)]
    pub author: Option<String>,
    /// New category
    #[arg(long)]
    pub category: Option<BookCategory>,
    /// New page count
    #[arg(long)]
    pub pages: Option<u32>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// New cover color
    #[arg(long)]
    pub color: Option<String>,
    /// New rating (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,
    /// Remove the rating
    #[arg(long, conflicts_with = "rating")]
    pub clear_rating: bool,
}

impl EditArgs {
    fn into_update(self) -> BookUpdate {
        let rating = if self.clear_rating {
            Some(None)
        } else {
            self.rating.map(Some)
        };

        BookUpdate {
            title: self.title,
            author: self.author,
            category: self.category,
            pages: self.pages,
            description: self.description,
            cover_color: self.color,
            rating,
            ..BookUpdate::default()
        }
    }
}

/// Add a new book
pub fn add(store: &mut Store, args: AddArgs, output: &Output) -> Result<()> {
    let mut data =
        NewBook::new(args.title, args.author, args.category, args.pages).with_status(args.status);
    if let Some(description) = args.description {
        data = data.with_description(description);
    }
    if let Some(color) = args.color {
        data = data.with_cover_color(color);
    }

    let mut book = store.add_book(data);

    // A book added as finished needs its finish date
    if book.status == ReadingStatus::Finished {
        store.update_status(&book.id, ReadingStatus::Finished);
        book = find_book(store, &book.id)?;
    }

    output.success(&format!("Added book: {}", book.id));
    output.print_book(&book, &[]);

    Ok(())
}

/// List books, optionally filtered by category and status
pub fn list(
    store: &Store,
    category: Option<BookCategory>,
    status: Option<ReadingStatus>,
    output: &Output,
) -> Result<()> {
    let books: Vec<Book> = match category {
        Some(c) => store.get_books_by_category(c),
        None => store.books().to_vec(),
    }
    .into_iter()
    .filter(|b| status.map_or(true, |s| b.status == s))
    .collect();

    output.print_books(&books);
    Ok(())
}

/// Show a single book with its notes
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let book = find_book(store, &id)?;
    let notes = store.get_notes_by_book_id(&book.id);

    output.print_book(&book, &notes);
    Ok(())
}

/// Edit a book
///
/// Without any field flags the user is prompted for each value.
pub fn edit(store: &mut Store, id: String, fields: EditArgs, output: &Output) -> Result<()> {
    let book = find_book(store, &id)?;

    let mut update = fields.into_update();
    if update.is_empty() && output.should_prompt() {
        update = prompt_for_update(&book)?;
    }

    if update.is_empty() {
        output.message("Nothing to update.");
        return Ok(());
    }

    store.update_book(&book.id, update);

    let updated = find_book(store, &book.id)?;
    output.success("Book updated");
    output.print_book(&updated, &store.get_notes_by_book_id(&updated.id));

    Ok(())
}

/// Delete a book along with its notes
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let book = find_book(store, &id)?;

    // Confirm deletion
    if output.should_prompt() {
        let note_count = store.get_notes_by_book_id(&book.id).len();
        println!("Delete book: {} - {}", short_id(&book.id), book.title);
        if note_count > 0 {
            println!("This also deletes {} note(s).", note_count);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_book(&book.id);

    output.success(&format!("Deleted book: {}", book.id));

    Ok(())
}

/// Record reading progress
pub fn progress(store: &mut Store, id: String, page: u32, output: &Output) -> Result<()> {
    let id = resolve_book_id(store, &id)?;

    store.update_reading_progress(&id, page);

    let book = find_book(store, &id)?;
    if book.is_finished() {
        output.success(&format!("Finished: {}", book.title));
    } else {
        output.success(&format!(
            "{}: page {} of {} ({}%)",
            book.title,
            page,
            book.pages,
            book.progress_percentage()
        ));
    }

    Ok(())
}

/// Set the reading status
pub fn set_status(
    store: &mut Store,
    id: String,
    status: ReadingStatus,
    output: &Output,
) -> Result<()> {
    let id = resolve_book_id(store, &id)?;

    store.update_status(&id, status);

    let book = find_book(store, &id)?;
    output.success(&format!("{}: {}", book.title, book.status.label()));

    Ok(())
}

/// Rate a book
pub fn rate(store: &mut Store, id: String, rating: u8, output: &Output) -> Result<()> {
    let id = resolve_book_id(store, &id)?;

    store.rate_book(&id, rating);

    let book = find_book(store, &id)?;
    output.success(&format!("Rated {}: {}/5", book.title, rating));

    Ok(())
}

/// Resolve an ID or prefix and fetch the book
fn find_book(store: &Store, id: &str) -> Result<Book> {
    let resolved = resolve_book_id(store, id)?;
    store
        .get_book_by_id(&resolved)
        .ok_or_else(|| anyhow!("Book not found: {}", id))
}

/// Interactively collect changes to a book
fn prompt_for_update(book: &Book) -> Result<BookUpdate> {
    println!("Editing book: {}", book.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut update = BookUpdate {
        title: prompt_with_default("Title", &book.title)?,
        author: prompt_with_default("Author", &book.author)?,
        ..BookUpdate::default()
    };

    if let Some(category) = prompt_with_default("Category", book.category.as_str())? {
        update.category = Some(category.parse()?);
    }

    if let Some(pages) = prompt_with_default("Pages", &book.pages.to_string())? {
        update.pages = Some(
            pages
                .parse()
                .with_context(|| format!("Invalid page count: {}", pages))?,
        );
    }

    update.description = prompt_with_default("Description", &book.description)?;

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::MemoryStorage;

    use crate::output::OutputFormat;

    fn add_args(title: &str, status: ReadingStatus) -> AddArgs {
        AddArgs {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            category: BookCategory::SciFi,
            pages: 412,
            description: None,
            color: None,
            status,
        }
    }

    #[test]
    fn test_add_finished_book_gets_finish_date() {
        let mut store = Store::with_storage(MemoryStorage::new(), "test-store");
        let output = Output::new(OutputFormat::Quiet);

        add(&mut store, add_args("Dune", ReadingStatus::Finished), &output).unwrap();

        let book = &store.books()[0];
        assert_eq!(book.title, "Dune");
        assert_eq!(book.status, ReadingStatus::Finished);
        assert!(book.date_finished.is_some());
    }

    #[test]
    fn test_add_unfinished_book_has_no_finish_date() {
        let mut store = Store::with_storage(MemoryStorage::new(), "test-store");
        let output = Output::new(OutputFormat::Quiet);

        add(&mut store, add_args("Dune", ReadingStatus::Reading), &output).unwrap();

        let book = &store.books()[0];
        assert_eq!(book.status, ReadingStatus::Reading);
        assert!(book.date_finished.is_none());
    }

    #[test]
    fn test_edit_args_into_update() {
        let update = EditArgs {
            title: Some("New Title".to_string()),
            pages: Some(300),
            rating: Some(4),
            ..EditArgs::default()
        }
        .into_update();

        assert_eq!(update.title.as_deref(), Some("New Title"));
        assert_eq!(update.pages, Some(300));
        assert_eq!(update.rating, Some(Some(4)));
        assert!(update.author.is_none());
        assert!(update.status.is_none());
    }

    #[test]
    fn test_clear_rating() {
        let update = EditArgs {
            clear_rating: true,
            ..EditArgs::default()
        }
        .into_update();
        assert_eq!(update.rating, Some(None));
    }

    #[test]
    fn test_empty_edit_args() {
        assert!(EditArgs::default().into_update().is_empty());
    }
}

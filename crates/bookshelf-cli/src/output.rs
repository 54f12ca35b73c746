//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use bookshelf_core::{Book, ReadingNote, ReadingStats, ReadingStatus};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book with its notes
    pub fn print_book(&self, book: &Book, notes: &[ReadingNote]) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", book.id);
                println!("Title:       {}", book.title);
                println!("Author:      {}", book.author);
                println!("Category:    {}", book.category.label());
                println!("Pages:       {}", book.pages);
                println!("Status:      {}", book.status.label());
                if let Some(current) = book.current_page {
                    println!(
                        "Progress:    page {} of {} ({}%)",
                        current,
                        book.pages,
                        book.progress_percentage()
                    );
                }
                if let Some(rating) = book.rating {
                    println!("Rating:      {}", stars(rating));
                }
                if !book.description.is_empty() {
                    println!("Description: {}", book.description);
                }
                println!("Cover:       {}", book.cover_color);
                println!("Added:       {}", book.date_added.format("%Y-%m-%d %H:%M"));
                if let Some(finished) = book.date_finished {
                    println!("Finished:    {}", finished.format("%Y-%m-%d %H:%M"));
                }

                if !notes.is_empty() {
                    println!();
                    println!("── Notes ({}) ──", notes.len());
                    for note in notes {
                        let preview = truncate_line(&note.content, 60);
                        match note.page {
                            Some(page) => println!(
                                "[{}] p.{} {}",
                                note.created_at.format("%Y-%m-%d"),
                                page,
                                preview
                            ),
                            None => println!("[{}] {}", note.created_at.format("%Y-%m-%d"), preview),
                        }
                    }
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "book": book, "notes": notes }));
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!(
                        "{} | {} | {} | {}",
                        short_id(&book.id),
                        truncate(&book.title, 35),
                        truncate(&book.author, 25),
                        status_summary(book)
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print notes for a specific book
    pub fn print_book_notes(&self, book: &Book, notes: &[ReadingNote]) {
        match self.format {
            OutputFormat::Human => {
                println!("Notes for: {} - {}", short_id(&book.id), book.title);
                println!();

                if notes.is_empty() {
                    println!("No notes on this book.");
                    return;
                }

                for note in notes {
                    println!("────────────────────────────────────────");
                    print!(
                        "ID: {}  Created: {}",
                        short_id(&note.id),
                        note.created_at.format("%Y-%m-%d %H:%M")
                    );
                    match note.page {
                        Some(page) => println!("  Page: {}", page),
                        None => println!(),
                    }
                    println!();
                    println!("{}", note.content);
                    println!();
                }
                println!("{} note(s)", notes.len());
            }
            OutputFormat::Json => print_json(notes),
            OutputFormat::Quiet => {
                for note in notes {
                    println!("{}", note.id);
                }
            }
        }
    }

    /// Print reading statistics, including the per-category breakdown
    pub fn print_stats(&self, stats: &ReadingStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Reading Stats");
                println!("=============");
                println!();
                println!("Books:        {}", stats.total_books);
                println!("  {:<13} {}", ReadingStatus::WantToRead.label(), stats.want_to_read);
                println!("  {:<13} {}", ReadingStatus::Reading.label(), stats.reading);
                println!("  {:<13} {}", ReadingStatus::Finished.label(), stats.finished);
                println!("Pages read:   {}", stats.pages_read);
                match stats.average_rating {
                    Some(avg) => println!("Avg rating:   {:.1}", avg),
                    None => println!("Avg rating:   (none)"),
                }
                println!("Notes:        {}", stats.total_notes);
                println!();
                self.print_categories(stats);
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => {
                println!("{}", stats.total_books);
            }
        }
    }

    /// Print book counts per category
    pub fn print_categories(&self, stats: &ReadingStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Categories:");
                for entry in &stats.by_category {
                    println!("  {:<12} {}", entry.category.label(), entry.count);
                }
            }
            OutputFormat::Json => print_json(&stats.by_category),
            OutputFormat::Quiet => {
                for entry in &stats.by_category {
                    println!("{}", entry.category);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// First 8 characters of an id, for compact listings
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// One-cell summary of reading state for listings
fn status_summary(book: &Book) -> String {
    let mut summary = match book.status {
        ReadingStatus::Reading => format!("reading {}%", book.progress_percentage()),
        other => other.as_str().to_string(),
    };
    if let Some(rating) = book.rating {
        summary.push_str(&format!(" {}", stars(rating)));
    }
    summary
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncate a string to max length in characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

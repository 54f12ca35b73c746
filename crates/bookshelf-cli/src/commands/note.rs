//! Reading note command handlers

use anyhow::{anyhow, bail, Result};

use bookshelf_core::Store;

use crate::commands::{resolve_book_id, resolve_note_id};
use crate::output::{short_id, Output, OutputFormat};
use crate::prompt::confirm;

/// Add a note to a book
pub fn add(
    store: &mut Store,
    book_id: String,
    content: String,
    page: Option<u32>,
    output: &Output,
) -> Result<()> {
    let book_id = resolve_book_id(store, &book_id)?;

    if content.trim().is_empty() {
        bail!("Note content cannot be empty");
    }

    let note = store.add_note(&book_id, content, page);

    match output.format {
        OutputFormat::Quiet => println!("{}", note.id),
        _ => output.success(&format!("Added note: {}", note.id)),
    }

    Ok(())
}

/// List notes on a book
pub fn list(store: &Store, book_id: String, output: &Output) -> Result<()> {
    let book_id = resolve_book_id(store, &book_id)?;
    let book = store
        .get_book_by_id(&book_id)
        .ok_or_else(|| anyhow!("Book not found: {}", book_id))?;

    output.print_book_notes(&book, &store.get_notes_by_book_id(&book.id));
    Ok(())
}

/// Delete a note
pub fn delete(store: &mut Store, note_id: String, output: &Output) -> Result<()> {
    let note_id = resolve_note_id(store, &note_id)?;

    // Confirm deletion
    if output.should_prompt() {
        if let Some(note) = store.notes().iter().find(|n| n.id == note_id) {
            let preview: String = note.content.chars().take(50).collect();
            println!("Delete note: {} - {}", short_id(&note.id), preview);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_note(&note_id);

    output.success(&format!("Deleted note: {}", note_id));

    Ok(())
}

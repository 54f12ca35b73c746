//! Stats command handler

use anyhow::Result;

use bookshelf_core::Store;

use crate::output::Output;

/// Show reading statistics for the collection
pub fn show(store: &Store, output: &Output) -> Result<()> {
    output.print_stats(&store.reading_stats());
    Ok(())
}

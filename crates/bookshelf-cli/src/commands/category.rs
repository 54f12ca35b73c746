//! Category command handler

use anyhow::Result;

use bookshelf_core::Store;

use crate::output::Output;

/// List every category with its book count
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_categories(&store.reading_stats());
    Ok(())
}

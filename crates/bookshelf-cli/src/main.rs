//! Bookshelf CLI
//!
//! Command-line interface for Bookshelf - a personal book collection with
//! reading progress and notes.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bookshelf_core::{BookCategory, Config, ReadingStatus, Store};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Bookshelf - track the books you read")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage reading notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Show book counts per category
    Categories,
    /// Show reading statistics
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookCommands {
    /// Add a book to the collection
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        book: commands::book::AddArgs,
    },
    /// List books, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Only books in this category
        #[arg(short, long)]
        category: Option<BookCategory>,
        /// Only books with this reading status
        #[arg(short, long)]
        status: Option<ReadingStatus>,
    },
    /// Show book details (including notes)
    Show {
        /// Book ID (full ID or prefix)
        id: String,
    },
    /// Edit a book (prompts for values when no flags are given)
    Edit {
        /// Book ID (full ID or prefix)
        id: String,
        #[command(flatten)]
        fields: commands::book::EditArgs,
    },
    /// Delete a book and its notes
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full ID or prefix)
        id: String,
    },
    /// Record the page you are on
    Progress {
        /// Book ID (full ID or prefix)
        id: String,
        /// Current page
        page: u32,
    },
    /// Set the reading status
    Status {
        /// Book ID (full ID or prefix)
        id: String,
        /// New status (want-to-read, reading, finished)
        status: ReadingStatus,
    },
    /// Rate a book from 1 to 5
    Rate {
        /// Book ID (full ID or prefix)
        id: String,
        /// Rating
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Add a note to a book
    #[command(alias = "create")]
    Add {
        /// Book ID (full ID or prefix)
        book_id: String,
        /// Note text
        content: String,
        /// Page the note refers to
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// List notes on a book
    #[command(alias = "ls")]
    List {
        /// Book ID (full ID or prefix)
        book_id: String,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID (full ID or prefix)
        note_id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, store_name, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config, cli.verbose);

    let mut store = Store::open_with_config(&config);
    debug!("Opened store {:?}", store);

    match cli.command {
        Commands::Book { command } => handle_book_command(command, &mut store, &output),
        Commands::Note { command } => handle_note_command(command, &mut store, &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Stats => commands::stats::show(&store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_book_command(command: BookCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        BookCommands::Add { book } => commands::book::add(store, book, output),
        BookCommands::List { category, status } => {
            commands::book::list(store, category, status, output)
        }
        BookCommands::Show { id } => commands::book::show(store, id, output),
        BookCommands::Edit { id, fields } => commands::book::edit(store, id, fields, output),
        BookCommands::Delete { id } => commands::book::delete(store, id, output),
        BookCommands::Progress { id, page } => commands::book::progress(store, id, page, output),
        BookCommands::Status { id, status } => {
            commands::book::set_status(store, id, status, output)
        }
        BookCommands::Rate { id, rating } => commands::book::rate(store, id, rating, output),
    }
}

fn handle_note_command(command: NoteCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        NoteCommands::Add {
            book_id,
            content,
            page,
        } => commands::note::add(store, book_id, content, page, output),
        NoteCommands::List { book_id } => commands::note::list(store, book_id, output),
        NoteCommands::Delete { note_id } => commands::note::delete(store, note_id, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output with `--verbose`. Logs go to `log_file` when configured, stderr
/// otherwise.
fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bookshelf_core={},bookshelf_cli={}", level, level))
    });

    match &config.log_file {
        Some(log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

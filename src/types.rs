//! Shared types for the heartnotes application.
//!
//! This module contains the crate-wide `Result` alias, the recency filter and
//! the command-line subcommands.
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::JournalError;

/// A specialized Result type for heartnotes operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Which notes to show, by how recently they were created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoteFilter {
    /// Every note
    #[default]
    All,
    /// Notes created today
    Today,
    /// Notes created during the last seven days
    Week,
}

/// Available subcommands for the heartnotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Write a new note
    Add {
        /// Text of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Image files to attach (repeatable)
        #[clap(short, long = "image")]
        images: Vec<PathBuf>,

        /// Mood tag for the note
        #[clap(short, long)]
        mood: Option<String>,

        /// Compose the text in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// List notes, newest first
    List {
        /// Only show notes from this period
        #[clap(short, long, value_enum)]
        filter: Option<NoteFilter>,

        /// Limit the number of notes shown
        #[clap(short = 'n', long)]
        limit: Option<usize>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show one line per note
        #[clap(short, long)]
        brief: bool,
    },

    /// Show a single note
    Show {
        /// ID of the note
        id: i64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Send a heart nudge
    Heart,

    /// Show how many hearts were sent today
    Hearts,

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}

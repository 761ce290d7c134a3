//! Couples journaling library
//!
//! This library provides a persisted, newest-first list of notes with optional
//! images and mood, recency filters, and a heart nudge counter that resets
//! every calendar day.

mod cli;
mod clock;
mod config;
mod counter;
mod errors;
mod helper;
mod images;
mod journal;
mod kv;
mod note;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use clock::*;
pub use config::*;
pub use counter::*;
pub use errors::*;
pub use helper::*;
pub use images::*;
pub use journal::*;
pub use kv::*;
pub use note::*;
pub use storage::*;
pub use types::*;

//! CLI module for the heartnotes application
//!
//! This module turns parsed commands into calls on the journal and prints the
//! results. The journal never calls back into this layer.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use chrono::{DateTime, Local};
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;
use tokio::sync::Mutex;

use crate::{
    content_preview, display_date, process_editor_content, Commands, Config, Journal,
    JournalError, Note, NoteFilter, Result,
};

/// CLI Application handler - processes CLI commands and interfaces with the journal
pub struct App {
    /// The journal backend
    journal: Arc<Mutex<Journal>>,

    /// Application configuration
    config: Config,

    /// Where the configuration is read from and written to
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given journal and config
    pub fn new(
        journal: Arc<Mutex<Journal>>,
        config: Config,
        config_path: PathBuf,
        verbose: bool,
    ) -> Self {
        Self {
            journal,
            config,
            config_path,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                content,
                images,
                mood,
                edit,
            } => self.add_note(content, images, mood, edit).await?,

            Commands::List {
                filter,
                limit,
                json,
                brief,
            } => self.list_notes(filter, limit, json, brief).await?,

            Commands::Show { id, json } => self.show_note(id, json).await?,

            Commands::Delete { id, force } => self.handle_delete(id, force).await?,

            Commands::Heart => {
                let count = self.journal.lock().await.send_heart()?;
                println!("{} {}", console::style("Heart sent!").red().bold(), hearts_today(count));
            }

            Commands::Hearts => {
                let count = self.journal.lock().await.heart_count()?;
                println!("{}", hearts_today(count));
            }

            Commands::Config { show, reset } => self.handle_config(show, reset)?,
        }

        Ok(())
    }

    async fn add_note(
        &self,
        content: Option<String>,
        images: Vec<PathBuf>,
        mood: Option<String>,
        edit: bool,
    ) -> Result<()> {
        let mut journal = self.journal.lock().await;

        if let Some(mood) = mood {
            journal.select_mood(mood);
        }

        if !images.is_empty() {
            let failures = journal.pending_mut().attach_files(&images).await;
            for failure in &failures {
                eprintln!("Skipped image: {}", failure);
            }
            debug!("{} of {} images attached", journal.pending().len(), images.len());
        }

        let text = if edit {
            self.open_editor_for_content(content.as_deref().unwrap_or(""))?
        } else {
            content.unwrap_or_default()
        };

        let note = journal.save_note(&text)?;
        println!("Note saved with ID: {}", note.id);
        if self.verbose && !note.images.is_empty() {
            println!("Attached {} photo(s)", note.images.len());
        }
        Ok(())
    }

    fn open_editor_for_content(&self, initial: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        let editor_cmd = self.config.get_editor_command();
        self.write_editor_template(&temp_path, initial)?;

        info!("Opening editor to write the note. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(process_editor_content(&content))
    }

    fn write_editor_template(&self, path: &Path, initial: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;

        writeln!(file, "<!--")?;
        writeln!(file, "Write your note below. Comment blocks like this one are removed.")?;
        writeln!(file, "Save and exit the editor when you're done.")?;
        writeln!(file, "-->")?;
        writeln!(file)?;
        if !initial.is_empty() {
            writeln!(file, "{}", initial)?;
        }

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| JournalError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(JournalError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program).args(rest).arg(file_path).status()?;

        if !status.success() {
            return Err(JournalError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    /// List notes according to the period filter
    async fn list_notes(
        &self,
        filter: Option<NoteFilter>,
        limit: Option<usize>,
        json: bool,
        brief: bool,
    ) -> Result<()> {
        let filter = filter.unwrap_or(self.config.default_filter);
        let limit = limit.unwrap_or(self.config.list_limit);

        let (mut notes, now) = {
            let journal = self.journal.lock().await;
            (journal.filtered(filter), journal.now())
        };
        let total = notes.len();
        notes.truncate(limit);

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes yet. Start sharing your day!");
            return Ok(());
        }

        if brief {
            for note in &notes {
                println!("{}", brief_line(note, now));
            }
        } else {
            self.display_notes_text(&notes, now);
        }

        println!(
            "\nShowing {} of {} note{}",
            notes.len(),
            total,
            if total == 1 { "" } else { "s" }
        );
        Ok(())
    }

    fn display_notes_text(&self, notes: &[Note], now: DateTime<Local>) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            print_note(note, now);
        }
    }

    async fn show_note(&self, id: i64, json: bool) -> Result<()> {
        let journal = self.journal.lock().await;
        let note = journal.note(id).ok_or(JournalError::NoteNotFound { id })?;

        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
        } else {
            print_note(note, journal.now());
        }
        Ok(())
    }

    async fn handle_delete(&self, id: i64, force: bool) -> Result<()> {
        let mut journal = self.journal.lock().await;

        let Some(note) = journal.note(id) else {
            println!("No note with ID {}", id);
            return Ok(());
        };

        if !force {
            println!("You are about to delete this note:");
            print_note(note, journal.now());
            print!("\nAre you sure? [y/N] ");
            stdout().flush()?;

            let mut answer = String::new();
            stdin().read_line(&mut answer)?;
            if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        if journal.delete_note(id)? {
            println!("Note {} deleted", id);
        }
        Ok(())
    }

    fn handle_config(&self, show: bool, reset: bool) -> Result<()> {
        if reset {
            Config::default().save(&self.config_path)?;
            println!("Configuration reset: {}", self.config_path.display());
        }

        if show || !reset {
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        Ok(())
    }
}

fn hearts_today(count: u64) -> String {
    format!("{} heart{} today", count, if count == 1 { "" } else { "s" })
}

fn brief_line(note: &Note, now: DateTime<Local>) -> String {
    let text = if note.has_content() {
        content_preview(&note.content, 60)
    } else {
        format!("[{} photo(s)]", note.images.len())
    };
    match &note.mood {
        Some(mood) => format!("{} | {} | {} | {}", note.id, display_date(note, now), mood, text),
        None => format!("{} | {} | {}", note.id, display_date(note, now), text),
    }
}

fn print_note(note: &Note, now: DateTime<Local>) {
    let mut header = format!("ID: {} | {}", note.id, display_date(note, now));
    if let Some(mood) = &note.mood {
        header.push_str(&format!(" | {}", console::style(mood).magenta()));
    }
    println!("{}", header);

    if note.has_content() {
        println!("\n{}", note.content);
    } else {
        println!("\n{}", console::style("No text content").italic());
    }

    if !note.images.is_empty() {
        let names = note
            .images
            .iter()
            .map(|img| img.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Photos: {}", console::style(names).cyan());
    }
}

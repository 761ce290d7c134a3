//! Small text helpers used when printing notes.
use chrono::{DateTime, Datelike, Local};

use crate::Note;

/// First line of `content`, cut to at most `max_len` characters.
pub fn content_preview(content: &str, max_len: usize) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.chars().count() <= max_len {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Strips `<!-- ... -->` blocks left over from the editor template.
pub fn process_editor_content(content: &str) -> String {
    let mut in_comment = false;
    let mut kept = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if !in_comment && trimmed.starts_with("<!--") {
            in_comment = true;
        }
        if in_comment {
            if trimmed.ends_with("-->") {
                in_comment = false;
            }
            continue;
        }
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

/// "Oct 19 at 08:30 PM", with the year added for notes from a different year
/// than `now`.
pub fn display_date(note: &Note, now: DateTime<Local>) -> String {
    let local = note.created_at.with_timezone(&Local);
    let date = if local.year() == now.year() {
        local.format("%b %-d")
    } else {
        local.format("%b %-d, %Y")
    };
    format!("{} at {}", date, local.format("%I:%M %p"))
}

//! Core data structures for the heartnotes application.
//!
//! A `Note` is one journal entry; an `Image` is an attachment, either waiting
//! in the pending selection buffer or embedded in a saved note.
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Represents a single journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, derived from the creation time in milliseconds
    pub id: i64,
    /// Text of the note, already trimmed
    pub content: String,
    /// Attached images in the order they were selected
    #[serde(default)]
    pub images: Vec<Image>,
    /// Optional mood tag
    #[serde(default)]
    pub mood: Option<String>,
    /// When the note was created
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    /// Same instant as `created_at`, in milliseconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl Note {
    /// Creates a note stamped with `created_at`.
    ///
    /// The instant is truncated to millisecond precision so that `date` and
    /// `timestamp` always describe the same moment.
    pub fn new(
        id: i64,
        content: String,
        images: Vec<Image>,
        mood: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let millis = created_at.timestamp_millis();
        let created_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(created_at);

        Note {
            id,
            content,
            images,
            mood,
            created_at,
            timestamp: millis,
        }
    }

    /// Fills in fields that older records did not carry.
    pub(crate) fn normalize(&mut self) {
        if self.timestamp == 0 {
            self.timestamp = self.created_at.timestamp_millis();
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// An image encoded as a self-contained data URI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Unique identifier within a selection batch
    #[serde(deserialize_with = "image_id_from_any")]
    pub id: String,
    /// `data:<mime>;base64,<payload>`
    pub data: String,
    /// Original file name, informational only
    #[serde(default)]
    pub name: String,
    /// Original file size in bytes, informational only
    #[serde(default)]
    pub size: u64,
}

impl Image {
    pub fn new(data: String, name: String, size: u64) -> Self {
        Image {
            id: generate_image_id(),
            data,
            name,
            size,
        }
    }

    /// MIME type declared by the data URI, if it has one.
    pub fn mime(&self) -> Option<&str> {
        let rest = self.data.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end])
    }
}

/// Millisecond timestamp plus a random suffix, so images decoded within the
/// same millisecond still get distinct ids.
pub fn generate_image_id() -> String {
    format!(
        "{}-{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

// Older records stored image ids as floating point numbers.
fn image_id_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_persisted_field_names() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let note = Note::new(42, "hello".into(), Vec::new(), Some("happy".into()), created);

        let value = serde_json::to_value(&note).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["content", "date", "id", "images", "mood", "timestamp"]);
        assert_eq!(obj["timestamp"], created.timestamp_millis());
        assert_eq!(obj["mood"], "happy");
    }

    #[test]
    fn reads_records_without_mood_or_timestamp() {
        let raw = r#"{
            "id": 1729339200000,
            "content": "first version",
            "images": [{"id": 1729339200000.25, "data": "data:image/png;base64,AAAA", "name": "a.png", "size": 3}],
            "date": "2024-10-19T12:00:00.000Z"
        }"#;

        let mut note: Note = serde_json::from_str(raw).unwrap();
        note.normalize();

        assert_eq!(note.mood, None);
        assert_eq!(note.timestamp, 1729339200000);
        assert_eq!(note.images[0].id, "1729339200000.25");
        assert_eq!(note.images[0].mime(), Some("image/png"));
    }

    #[test]
    fn image_ids_differ_within_a_batch() {
        let a = generate_image_id();
        let b = generate_image_id();
        assert_ne!(a, b);
    }
}

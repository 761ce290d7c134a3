//! The note store: a newest-first list of notes kept in one key-value entry,
//! and the recency filters applied to it.
use chrono::{DateTime, Duration, Local, Utc};
use log::{debug, error, info, trace, warn};

use crate::{
    Clock, Image, JournalError, KeyValueStore, Note, NoteFilter, Result, NOTES_KEY,
    UNREADABLE_NOTES_KEY,
};

/// Owns the ordered list of notes, newest first, and mirrors it to a
/// key-value store after every mutation.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    /// In-memory mirror of the persisted list
    notes: Vec<Note>,

    /// Stored value that failed to parse, set aside before the next write
    unreadable: Option<String>,
}

impl NoteStore {
    /// Creates an empty store that has never been persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted list of notes.
    ///
    /// Absent or malformed data yields an empty store; only a failure of the
    /// backend itself is returned as an error.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self> {
        let raw = match kv.get(NOTES_KEY)? {
            Some(raw) => raw,
            None => {
                debug!("No notes stored yet");
                return Ok(Self::new());
            }
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(mut notes) => {
                notes.iter_mut().for_each(Note::normalize);
                info!("Loaded {} notes", notes.len());
                Ok(Self {
                    notes,
                    unreadable: None,
                })
            }
            Err(e) => {
                error!(
                    "Stored notes are malformed ({} bytes), starting empty: {}",
                    raw.len(),
                    e
                );
                Ok(Self {
                    notes: Vec::new(),
                    unreadable: Some(raw),
                })
            }
        }
    }

    /// Validates and saves a new note at the head of the list.
    ///
    /// The list is persisted before the in-memory mirror changes, so a storage
    /// failure leaves the store exactly as it was.
    pub fn add(
        &mut self,
        kv: &mut dyn KeyValueStore,
        clock: &dyn Clock,
        content: &str,
        images: Vec<Image>,
        mood: Option<String>,
    ) -> Result<Note> {
        let content = content.trim();
        if content.is_empty() && images.is_empty() {
            return Err(JournalError::Validation {
                message: "write a note or add some photos".to_string(),
            });
        }

        let mood = mood
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let now = clock.now().with_timezone(&Utc);
        let id = self.next_id(now.timestamp_millis());
        let note = Note::new(id, content.to_string(), images, mood, now);
        debug!("Creating note {} with {} images", note.id, note.images.len());

        let mut candidate = Vec::with_capacity(self.notes.len() + 1);
        candidate.push(note.clone());
        candidate.extend(self.notes.iter().cloned());

        self.persist(kv, &candidate)?;
        self.notes = candidate;

        info!("Note saved: {}", note.id);
        Ok(note)
    }

    /// Removes the note with `id`. Returns `false` without writing anything
    /// when no such note exists.
    pub fn delete_by_id(&mut self, kv: &mut dyn KeyValueStore, id: i64) -> Result<bool> {
        let Some(position) = self.notes.iter().position(|n| n.id == id) else {
            debug!("Note not found for deletion: {}", id);
            return Ok(false);
        };

        let mut candidate = self.notes.clone();
        candidate.remove(position);

        self.persist(kv, &candidate)?;
        self.notes = candidate;

        info!("Note deleted: {}", id);
        Ok(true)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether an unparsable stored value is waiting to be set aside.
    pub fn has_unreadable_data(&self) -> bool {
        self.unreadable.is_some()
    }

    // Writes the whole list. Unparsable data found at load time is copied
    // under its own key first and never overwritten in place.
    fn persist(&mut self, kv: &mut dyn KeyValueStore, notes: &[Note]) -> Result<()> {
        if let Some(raw) = &self.unreadable {
            kv.set(UNREADABLE_NOTES_KEY, raw).map_err(|e| {
                error!("Failed to set aside unreadable notes: {}", e);
                e
            })?;
            warn!("Unreadable notes moved to {}", UNREADABLE_NOTES_KEY);
            self.unreadable = None;
        }
        write_notes(kv, notes)
    }

    // Wall-clock millis, bumped past the newest id so two saves within the
    // same millisecond still get distinct ids.
    fn next_id(&self, now_millis: i64) -> i64 {
        match self.notes.iter().map(|n| n.id).max() {
            Some(newest) if newest >= now_millis => newest + 1,
            _ => now_millis,
        }
    }
}

fn write_notes(kv: &mut dyn KeyValueStore, notes: &[Note]) -> Result<()> {
    trace!("Serializing {} notes", notes.len());
    let json = serde_json::to_string(notes).map_err(|e| {
        error!("Failed to serialize notes: {}", e);
        JournalError::Serialization(e)
    })?;
    kv.set(NOTES_KEY, &json).map_err(|e| {
        error!("Failed to persist notes: {}", e);
        e
    })
}

/// Selects the notes matching `filter`, keeping their relative order.
///
/// Both recency filters compare local calendar dates only: `Today` keeps notes
/// created on the same date as `now`, `Week` keeps notes created on or after
/// the date seven days before `now`, whatever the time of day.
pub fn filter_notes(notes: &[Note], filter: NoteFilter, now: DateTime<Local>) -> Vec<Note> {
    let today = now.date_naive();
    let created_on = |note: &Note| note.created_at.with_timezone(&Local).date_naive();

    match filter {
        NoteFilter::All => notes.to_vec(),
        NoteFilter::Today => notes
            .iter()
            .filter(|n| created_on(n) == today)
            .cloned()
            .collect(),
        NoteFilter::Week => {
            let week_ago = today - Duration::days(7);
            notes
                .iter()
                .filter(|n| created_on(n) >= week_ago)
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{FixedClock, MemoryStore};

    fn noon(days_ago: i64) -> DateTime<Local> {
        let base = Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        base - Duration::days(days_ago)
    }

    fn image(name: &str) -> Image {
        Image::new("data:image/png;base64,AAAA".into(), name.into(), 3)
    }

    #[test]
    fn add_then_load_round_trips_through_storage() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::load(&kv).unwrap();

        store.add(&mut kv, &clock, "older", Vec::new(), None).unwrap();
        clock.advance(Duration::minutes(5));
        let added = store
            .add(&mut kv, &clock, "  missed you  ", vec![image("us.png")], Some("happy".into()))
            .unwrap();

        let reloaded = NoteStore::load(&kv).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.notes()[0], added);
        assert_eq!(added.content, "missed you");
        assert_eq!(added.mood.as_deref(), Some("happy"));
        assert_eq!(added.timestamp, added.created_at.timestamp_millis());
    }

    #[test]
    fn empty_note_without_images_is_rejected() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();

        let err = store.add(&mut kv, &clock, "   ", Vec::new(), None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(kv.write_count(), 0);

        let note = store.add(&mut kv, &clock, "", vec![image("a.png")], None).unwrap();
        assert!(!note.has_content());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();

        let a = store.add(&mut kv, &clock, "a", Vec::new(), None).unwrap();
        let b = store.add(&mut kv, &clock, "b", Vec::new(), None).unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn blank_mood_is_dropped() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();

        let note = store.add(&mut kv, &clock, "hi", Vec::new(), Some("  ".into())).unwrap();
        assert_eq!(note.mood, None);
    }

    #[test]
    fn delete_removes_only_the_matching_note() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();

        let first = store.add(&mut kv, &clock, "one", Vec::new(), None).unwrap();
        let second = store.add(&mut kv, &clock, "two", Vec::new(), None).unwrap();

        assert!(store.delete_by_id(&mut kv, first.id).unwrap());

        let reloaded = NoteStore::load(&kv).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get(first.id).is_none());
        assert_eq!(reloaded.notes()[0].id, second.id);
    }

    #[test]
    fn deleting_absent_id_is_a_noop() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();
        store.add(&mut kv, &clock, "one", Vec::new(), None).unwrap();
        let writes = kv.write_count();

        assert!(!store.delete_by_id(&mut kv, 7).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn storage_failure_leaves_list_untouched() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        let mut store = NoteStore::new();
        let kept = store.add(&mut kv, &clock, "kept", Vec::new(), None).unwrap();

        kv.set_fail_writes(true);
        let err = store.add(&mut kv, &clock, "lost?", Vec::new(), None).unwrap_err();
        assert!(matches!(err, JournalError::Storage { .. }));
        assert!(store.delete_by_id(&mut kv, kept.id).is_err());

        assert_eq!(store.notes(), &[kept][..]);
    }

    #[test]
    fn malformed_or_absent_data_loads_empty() {
        let mut kv = MemoryStore::new();
        assert!(NoteStore::load(&kv).unwrap().is_empty());

        kv.set(NOTES_KEY, "{not json").unwrap();
        assert!(NoteStore::load(&kv).unwrap().is_empty());
    }

    #[test]
    fn malformed_data_is_set_aside_before_first_save() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(0));
        kv.set(NOTES_KEY, "{not json").unwrap();

        let mut store = NoteStore::load(&kv).unwrap();
        assert!(store.has_unreadable_data());

        kv.set_fail_writes(true);
        assert!(store.add(&mut kv, &clock, "first", Vec::new(), None).is_err());
        assert!(store.has_unreadable_data());
        assert_eq!(kv.get(NOTES_KEY).unwrap().as_deref(), Some("{not json"));

        kv.set_fail_writes(false);
        store.add(&mut kv, &clock, "first", Vec::new(), None).unwrap();
        assert!(!store.has_unreadable_data());
        assert_eq!(
            kv.get(UNREADABLE_NOTES_KEY).unwrap().as_deref(),
            Some("{not json")
        );

        let reloaded = NoteStore::load(&kv).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(!reloaded.has_unreadable_data());
    }

    #[test]
    fn today_filter_keeps_same_date_in_order() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(1));
        let mut store = NoteStore::new();

        store.add(&mut kv, &clock, "yesterday", Vec::new(), None).unwrap();
        clock.set(noon(0) - Duration::hours(3));
        store.add(&mut kv, &clock, "morning", Vec::new(), None).unwrap();
        clock.set(noon(0));
        store.add(&mut kv, &clock, "noon", Vec::new(), None).unwrap();

        let today = filter_notes(store.notes(), NoteFilter::Today, clock.now());
        let contents: Vec<_> = today.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, ["noon", "morning"]);
    }

    #[test]
    fn week_filter_excludes_older_notes() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(10));
        let mut store = NoteStore::new();

        store.add(&mut kv, &clock, "ten days", Vec::new(), None).unwrap();
        clock.set(noon(3));
        store.add(&mut kv, &clock, "three days", Vec::new(), None).unwrap();
        clock.set(noon(0));
        store.add(&mut kv, &clock, "today", Vec::new(), None).unwrap();

        let week = filter_notes(store.notes(), NoteFilter::Week, clock.now());
        let contents: Vec<_> = week.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, ["today", "three days"]);
        assert_eq!(filter_notes(store.notes(), NoteFilter::All, clock.now()).len(), 3);
    }

    #[test]
    fn week_boundary_ignores_time_of_day() {
        let mut kv = MemoryStore::new();
        let clock = FixedClock::new(noon(7) - Duration::hours(3));
        let mut store = NoteStore::new();
        store.add(&mut kv, &clock, "seven days, earlier hour", Vec::new(), None).unwrap();

        clock.set(noon(8));
        store.add(&mut kv, &clock, "eight days", Vec::new(), None).unwrap();

        let week = filter_notes(store.notes(), NoteFilter::Week, noon(0));
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].content, "seven days, earlier hour");
    }
}

//! The journal as a whole: notes, heart counter and the note being drafted.
use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::{
    filter_notes, Clock, CounterState, KeyValueStore, Note, NoteFilter, NoteStore, PendingImages,
    Result,
};

/// Application state: the notes, the heart counter and the draft being
/// composed, together with the store and clock they depend on.
pub struct Journal {
    /// Persistent backend shared by notes and counter
    kv: Box<dyn KeyValueStore + Send>,

    clock: Box<dyn Clock>,

    notes: NoteStore,

    hearts: CounterState,

    /// Images selected for the next note
    pending: PendingImages,

    /// Mood selected for the next note
    mood: Option<String>,
}

impl Journal {
    /// Loads notes and counter from `kv`, resetting the counter if the day
    /// has changed since it was last used.
    ///
    /// A failed reset does not stop the journal from opening; the counter is
    /// checked again before every read or increment.
    pub fn open(kv: Box<dyn KeyValueStore + Send>, clock: Box<dyn Clock>) -> Result<Self> {
        let mut kv = kv;
        let notes = NoteStore::load(&*kv)?;
        let loaded = CounterState::load(&*kv)?;
        let hearts = match loaded
            .clone()
            .check_and_reset_if_new_day(&mut *kv, clock.today())
        {
            Ok(hearts) => hearts,
            Err(e) => {
                warn!("Could not reset heart counter, retrying on next use: {}", e);
                loaded
            }
        };

        info!(
            "Journal opened with {} notes and {} hearts today",
            notes.len(),
            hearts.heart_count
        );
        Ok(Self {
            kv,
            clock,
            notes,
            hearts,
            pending: PendingImages::new(),
            mood: None,
        })
    }

    /// Saves `content` together with the pending images and selected mood.
    ///
    /// The draft is cleared only when the note was saved.
    pub fn save_note(&mut self, content: &str) -> Result<Note> {
        let images = self.pending.images().to_vec();
        let note = self.notes.add(
            &mut *self.kv,
            &*self.clock,
            content,
            images,
            self.mood.clone(),
        )?;

        self.clear_draft();
        Ok(note)
    }

    pub fn delete_note(&mut self, id: i64) -> Result<bool> {
        self.notes.delete_by_id(&mut *self.kv, id)
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn note(&self, id: i64) -> Option<&Note> {
        self.notes.get(id)
    }

    /// The current instant according to the journal's clock.
    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn filtered(&self, filter: NoteFilter) -> Vec<Note> {
        filter_notes(self.notes.notes(), filter, self.clock.now())
    }

    /// Today's heart count.
    pub fn heart_count(&mut self) -> Result<u64> {
        self.refresh_hearts()?;
        Ok(self.hearts.heart_count)
    }

    /// Sends one heart and returns today's new count.
    pub fn send_heart(&mut self) -> Result<u64> {
        self.refresh_hearts()?;
        self.hearts = self.hearts.clone().increment(&mut *self.kv)?;
        info!("Heart sent, {} today", self.hearts.heart_count);
        Ok(self.hearts.heart_count)
    }

    fn refresh_hearts(&mut self) -> Result<()> {
        let today = self.clock.today();
        self.hearts = self
            .hearts
            .clone()
            .check_and_reset_if_new_day(&mut *self.kv, today)?;
        Ok(())
    }

    pub fn select_mood(&mut self, mood: impl Into<String>) {
        let mood = mood.into();
        debug!("Mood selected: {}", mood);
        self.mood = Some(mood);
    }

    pub fn clear_mood(&mut self) {
        self.mood = None;
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    pub fn pending(&self) -> &PendingImages {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingImages {
        &mut self.pending
    }

    /// Drops the pending images and the selected mood.
    pub fn clear_draft(&mut self) {
        self.pending.clear();
        self.mood = None;
    }
}

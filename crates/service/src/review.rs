//! Review session state machine.
//!
//! `NotStarted -> InProgress -> Completed`, with skip-on-last aborting back
//! to `NotStarted`. The machine freezes an ordered snapshot of the notes at
//! start time, so edits and inserts elsewhere never reorder or resize a
//! session in flight. A versioned checkpoint is written to key-value storage
//! after every transition while active, which lets a restarted process pick
//! up mid-session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use studykeep_core::{
    Note, NotePatch, ReviewCheckpoint, ReviewResponse, ReviewSummary, UnderstandingLevel,
    CHECKPOINT_SCHEMA_VERSION,
};
use studykeep_storage::{keys, KvStore};

use crate::data::DataService;
use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// What a finished session hands back: the raw responses plus derived stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReport {
    pub responses: Vec<ReviewResponse>,
    pub summary: ReviewSummary,
}

#[derive(Debug)]
struct ActiveReview {
    ordered_ids: Vec<String>,
    notes_by_id: HashMap<String, Note>,
    current_index: usize,
    answer_revealed: bool,
    responses: Vec<ReviewResponse>,
    completed_ids: Vec<String>,
    started_at: DateTime<Utc>,
}

impl ActiveReview {
    fn checkpoint(&self) -> ReviewCheckpoint {
        ReviewCheckpoint {
            schema_version: CHECKPOINT_SCHEMA_VERSION,
            ordered_note_ids: self.ordered_ids.clone(),
            current_index: self.current_index,
            completed_note_ids: self.completed_ids.clone(),
            responses: self.responses.clone(),
            started_at: self.started_at,
            is_active: true,
            saved_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
enum State {
    NotStarted,
    InProgress(ActiveReview),
    Completed(ReviewReport),
}

pub struct ReviewSession {
    data: Arc<DataService>,
    kv: Arc<dyn KvStore>,
    state: State,
}

impl ReviewSession {
    pub fn new(data: Arc<DataService>, kv: Arc<dyn KvStore>) -> Self {
        Self { data, kv, state: State::NotStarted }
    }

    pub fn phase(&self) -> ReviewPhase {
        match self.state {
            State::NotStarted => ReviewPhase::NotStarted,
            State::InProgress(_) => ReviewPhase::InProgress,
            State::Completed(_) => ReviewPhase::Completed,
        }
    }

    /// The note the user is looking at, while a session is in progress.
    pub fn current_note(&self) -> Option<&Note> {
        let State::InProgress(active) = &self.state else {
            return None;
        };
        let id = active.ordered_ids.get(active.current_index)?;
        active.notes_by_id.get(id)
    }

    /// Zero-based position and total, while a session is in progress.
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.state {
            State::InProgress(active) => Some((active.current_index, active.ordered_ids.len())),
            _ => None,
        }
    }

    pub fn is_answer_revealed(&self) -> bool {
        matches!(&self.state, State::InProgress(active) if active.answer_revealed)
    }

    /// The retained report, after a session completed and before `close`.
    pub fn report(&self) -> Option<&ReviewReport> {
        match &self.state {
            State::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// Begin a session over the given notes, in the given order. The snapshot
    /// is frozen here: later external edits to the note list do not affect
    /// an active session.
    pub fn start(&mut self, notes: Vec<Note>) -> Result<(), ServiceError> {
        if notes.is_empty() {
            return Err(ServiceError::InvalidInput("no notes to review".to_owned()));
        }
        let ordered_ids: Vec<String> = notes.iter().map(|n| n.id.clone()).collect();
        let notes_by_id = notes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let active = ActiveReview {
            ordered_ids,
            notes_by_id,
            current_index: 0,
            answer_revealed: false,
            responses: Vec::new(),
            completed_ids: Vec::new(),
            started_at: Utc::now(),
        };
        self.persist(&active);
        self.state = State::InProgress(active);
        Ok(())
    }

    /// Fresh session from a completed one, over re-fetched notes.
    pub fn restart(&mut self, notes: Vec<Note>) -> Result<(), ServiceError> {
        self.start(notes)
    }

    /// Show the answer for the current note. Grading requires this first.
    pub fn reveal_answer(&mut self) {
        if let State::InProgress(active) = &mut self.state {
            active.answer_revealed = true;
        }
    }

    /// Grade the current note and advance. The new level is written through
    /// the data service; if that write fails the machine stays on the same
    /// note and the error surfaces to the caller. Grading the last note
    /// completes the session and retains the report.
    pub async fn record_response(&mut self, level: u8) -> Result<(), ServiceError> {
        let next = UnderstandingLevel::new(level)
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;

        let State::InProgress(active) = &mut self.state else {
            return Err(ServiceError::InvalidInput("no review in progress".to_owned()));
        };
        if !active.answer_revealed {
            return Err(ServiceError::InvalidInput(
                "answer must be revealed before grading".to_owned(),
            ));
        }
        let Some(note_id) = active.ordered_ids.get(active.current_index).cloned() else {
            return Err(ServiceError::InvalidInput("review position out of range".to_owned()));
        };
        let previous = active
            .notes_by_id
            .get(&note_id)
            .map_or(next, |note| note.understanding_level);

        // No advance on failure: `?` returns before any state changes.
        let stored = self.data.update_note_silent(&note_id, NotePatch::understanding(next)).await?;
        if stored.is_none() {
            // Deleted out from under the session. Keep the snapshot response;
            // the summary still reflects what the user graded.
            tracing::warn!(note_id = %note_id, "graded note no longer exists in storage");
        }

        let State::InProgress(active) = &mut self.state else {
            // record_response holds &mut self across the await, state cannot
            // have changed.
            return Err(ServiceError::InvalidInput("no review in progress".to_owned()));
        };
        if let Some(note) = active.notes_by_id.get_mut(&note_id) {
            note.understanding_level = next;
        }
        active.responses.push(ReviewResponse { note_id: note_id.clone(), previous, next });
        active.completed_ids.push(note_id);

        if active.current_index + 1 >= active.ordered_ids.len() {
            let summary = ReviewSummary::compute(&active.responses, active.started_at, Utc::now());
            let report = ReviewReport { responses: std::mem::take(&mut active.responses), summary };
            self.clear_checkpoint();
            self.state = State::Completed(report);
        } else {
            active.current_index += 1;
            active.answer_revealed = false;
            let checkpoint = active.checkpoint();
            self.save_checkpoint(&checkpoint);
        }
        Ok(())
    }

    /// Move past the current note without grading it. Skipping the last note
    /// abandons the session: checkpoint cleared, no report.
    pub fn skip(&mut self) {
        let State::InProgress(active) = &mut self.state else {
            return;
        };
        if active.current_index + 1 >= active.ordered_ids.len() {
            self.clear_checkpoint();
            self.state = State::NotStarted;
        } else {
            active.current_index += 1;
            active.answer_revealed = false;
            let checkpoint = active.checkpoint();
            self.save_checkpoint(&checkpoint);
        }
    }

    /// Abandon the session from anywhere: checkpoint cleared, no report.
    pub fn end(&mut self) {
        self.clear_checkpoint();
        self.state = State::NotStarted;
    }

    /// Dismiss a retained report.
    pub fn close(&mut self) {
        if matches!(self.state, State::Completed(_)) {
            self.state = State::NotStarted;
        }
    }

    /// Rebuild an in-progress session from a persisted checkpoint.
    ///
    /// Ids that no longer resolve against `live_notes` are dropped and the
    /// position clamped; a checkpoint that is inactive, unparseable, or from
    /// another schema version is discarded. Returns whether a session was
    /// resumed.
    pub fn resume(&mut self, live_notes: &[Note]) -> bool {
        let Some(raw) = self.kv.get(keys::REVIEW_CHECKPOINT) else {
            return false;
        };
        let checkpoint: ReviewCheckpoint = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable review checkpoint");
                self.clear_checkpoint();
                return false;
            },
        };
        if !checkpoint.is_active || !checkpoint.is_current_version() {
            self.clear_checkpoint();
            return false;
        }

        let by_id: HashMap<&str, &Note> =
            live_notes.iter().map(|n| (n.id.as_str(), n)).collect();
        let ordered_ids: Vec<String> = checkpoint
            .ordered_note_ids
            .into_iter()
            .filter(|id| by_id.contains_key(id.as_str()))
            .collect();
        if ordered_ids.is_empty() {
            tracing::warn!("checkpointed notes all gone, discarding review checkpoint");
            self.clear_checkpoint();
            return false;
        }

        let notes_by_id: HashMap<String, Note> = ordered_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|n| (id.clone(), (*n).clone())))
            .collect();
        let active = ActiveReview {
            current_index: checkpoint.current_index.min(ordered_ids.len() - 1),
            ordered_ids,
            notes_by_id,
            answer_revealed: false,
            responses: checkpoint.responses,
            completed_ids: checkpoint.completed_note_ids,
            started_at: checkpoint.started_at,
        };
        self.persist(&active);
        self.state = State::InProgress(active);
        true
    }

    fn persist(&self, active: &ActiveReview) {
        self.save_checkpoint(&active.checkpoint());
    }

    fn save_checkpoint(&self, checkpoint: &ReviewCheckpoint) {
        match serde_json::to_string(checkpoint) {
            Ok(json) => self.kv.set(keys::REVIEW_CHECKPOINT, &json),
            Err(e) => tracing::warn!(error = %e, "review checkpoint not serializable"),
        }
    }

    fn clear_checkpoint(&self) {
        self.kv.remove(keys::REVIEW_CHECKPOINT);
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Longest admissible daily study time, in minutes (one full day).
pub const MAX_STUDY_MINUTES: u16 = 1440;

/// Bounded ordinal in `[1, 5]` describing the day's mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::MoodOutOfRange(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Mood {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

/// One study-journal entry. Invariant: at most one entry per calendar date
/// per tenant; writes for an existing date merge instead of duplicating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: String,
    pub date: NaiveDate,
    pub study_time: u16,
    pub mood: Mood,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntryDraft {
    pub date: NaiveDate,
    pub study_time: u16,
    pub mood: Mood,
    #[serde(default)]
    pub notes: String,
}

impl DailyEntryDraft {
    /// Structural validation; business rules live upstream in form layers.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.study_time > MAX_STUDY_MINUTES {
            return Err(CoreError::StudyTimeOutOfRange {
                got: self.study_time,
                max: MAX_STUDY_MINUTES,
            });
        }
        Ok(())
    }
}

/// Partial update for a daily entry. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DailyEntryPatch {
    pub date: Option<NaiveDate>,
    pub study_time: Option<u16>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
}

impl DailyEntry {
    /// Merge a patch into this entry. The caller refreshes `updated_at`.
    pub fn apply(&mut self, patch: DailyEntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(study_time) = patch.study_time {
            self.study_time = study_time;
        }
        if let Some(mood) = patch.mood {
            self.mood = mood;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    /// Strip identity and timestamps, keeping the user-supplied fields.
    pub fn into_draft(self) -> DailyEntryDraft {
        DailyEntryDraft {
            date: self.date,
            study_time: self.study_time,
            mood: self.mood,
            notes: self.notes,
        }
    }

    /// Merge the upsert-by-date fields of a draft into this entry.
    pub fn merge_draft(&mut self, draft: DailyEntryDraft) {
        self.study_time = draft.study_time;
        self.mood = draft.mood;
        self.notes = draft.notes;
    }
}

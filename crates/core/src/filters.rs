use serde::{Deserialize, Serialize};

use crate::UnderstandingLevel;

/// Conjunction of note filters. Both backends must produce identical result
/// sets for identical filter inputs over identical data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFilters {
    /// Exact match on the owning course id.
    pub course_id: Option<String>,
    /// Exact match on the understanding level.
    pub understanding_level: Option<UnderstandingLevel>,
    /// Exact match on the flag bit.
    pub flagged: Option<bool>,
    /// Case-insensitive substring over question, answer and code snippet.
    pub search: Option<String>,
}

impl NoteFilters {
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none()
            && self.understanding_level.is_none()
            && self.flagged.is_none()
            && self.search.is_none()
    }

    pub fn for_course(course_id: impl Into<String>) -> Self {
        Self { course_id: Some(course_id.into()), ..Self::default() }
    }

    pub fn flagged_only() -> Self {
        Self { flagged: Some(true), ..Self::default() }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UnderstandingLevel;

/// Current checkpoint payload layout. Bump when the shape changes; loaders
/// discard checkpoints written under a different version instead of failing
/// to parse them.
pub const CHECKPOINT_SCHEMA_VERSION: u32 = 1;

/// One recorded answer: the level before and after reviewing a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub note_id: String,
    pub previous: UnderstandingLevel,
    pub next: UnderstandingLevel,
}

/// Durable snapshot of an in-progress review session.
///
/// Lives in client-side key-value storage only, never in the backend. Written
/// after every transition while the session is active so a reload resumes at
/// the same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCheckpoint {
    pub schema_version: u32,
    pub ordered_note_ids: Vec<String>,
    pub current_index: usize,
    pub completed_note_ids: Vec<String>,
    pub responses: Vec<ReviewResponse>,
    pub started_at: DateTime<Utc>,
    pub is_active: bool,
    pub saved_at: DateTime<Utc>,
}

impl ReviewCheckpoint {
    pub fn is_current_version(&self) -> bool {
        self.schema_version == CHECKPOINT_SCHEMA_VERSION
    }
}

/// Completed-session statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub improved: usize,
    pub regressed: usize,
    pub unchanged: usize,
    /// `round(100 * count(next >= 4) / total)`, 0 for an empty session.
    pub accuracy_pct: u8,
    pub elapsed_secs: i64,
}

impl ReviewSummary {
    /// Pure function of the responses and the session clock; reads no other
    /// state so the same inputs always yield the same summary.
    pub fn compute(
        responses: &[ReviewResponse],
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let improved = responses.iter().filter(|r| r.next > r.previous).count();
        let regressed = responses.iter().filter(|r| r.next < r.previous).count();
        let unchanged = responses.len() - improved - regressed;
        let correct = responses
            .iter()
            .filter(|r| r.next.get() >= 4)
            .count();
        let accuracy_pct = if responses.is_empty() {
            0
        } else {
            // ratio is in [0, 1], the rounded percentage fits u8
            (correct as f64 / responses.len() as f64 * 100.0).round() as u8
        };
        Self {
            total: responses.len(),
            improved,
            regressed,
            unchanged,
            accuracy_pct,
            elapsed_secs: (now - started_at).num_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn response(previous: u8, next: u8) -> ReviewResponse {
        ReviewResponse {
            note_id: format!("note-{previous}-{next}"),
            previous: UnderstandingLevel::new(previous).unwrap(),
            next: UnderstandingLevel::new(next).unwrap(),
        }
    }

    #[test]
    fn summary_is_deterministic() {
        let responses = vec![response(2, 4), response(3, 3), response(5, 2)];
        let started = Utc::now();
        let now = started + TimeDelta::seconds(90);

        let summary = ReviewSummary::compute(&responses, started, now);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.improved, 1);
        assert_eq!(summary.regressed, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.accuracy_pct, 33);
        assert_eq!(summary.elapsed_secs, 90);

        let again = ReviewSummary::compute(&responses, started, now);
        assert_eq!(summary, again);
    }

    #[test]
    fn empty_session_has_zero_accuracy() {
        let started = Utc::now();
        let summary = ReviewSummary::compute(&[], started, started);
        assert_eq!(summary.accuracy_pct, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.unchanged, 0);
    }

    #[test]
    fn all_confident_responses_hit_full_accuracy() {
        let responses = vec![response(2, 4), response(5, 5)];
        let started = Utc::now();
        let summary = ReviewSummary::compute(&responses, started, started);
        assert_eq!(summary.accuracy_pct, 100);
        assert_eq!(summary.improved, 1);
        assert_eq!(summary.unchanged, 1);
    }

    #[test]
    fn stale_checkpoint_version_detected() {
        let checkpoint = ReviewCheckpoint {
            schema_version: CHECKPOINT_SCHEMA_VERSION + 1,
            ordered_note_ids: vec![],
            current_index: 0,
            completed_note_ids: vec![],
            responses: vec![],
            started_at: Utc::now(),
            is_active: true,
            saved_at: Utc::now(),
        };
        assert!(!checkpoint.is_current_version());
    }
}

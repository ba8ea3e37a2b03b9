use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course the user is studying. Owned by exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub instructor: String,
    pub title: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a course; the backend assigns id and
/// timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseDraft {
    pub instructor: String,
    pub title: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Partial update for a course. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub instructor: Option<String>,
    pub title: Option<String>,
    pub links: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
}

impl Course {
    /// Merge a patch into this course. The caller refreshes `updated_at`.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(links) = patch.links {
            self.links = links;
        }
        if let Some(topics) = patch.topics {
            self.topics = topics;
        }
    }

    /// Strip identity and timestamps, keeping the user-supplied fields.
    /// The migration engine re-creates records through this.
    pub fn into_draft(self) -> CourseDraft {
        CourseDraft {
            instructor: self.instructor,
            title: self.title,
            links: self.links,
            topics: self.topics,
        }
    }
}

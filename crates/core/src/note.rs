use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Bounded ordinal in `[1, 5]` describing how well a note is understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UnderstandingLevel(u8);

impl UnderstandingLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::LevelOutOfRange(value))
        }
    }

    /// Round a computed value (average, interpolation) back into the scale.
    pub fn clamp_round(value: f64) -> Self {
        let rounded = value.round();
        if rounded < 1.0 {
            Self(1)
        } else if rounded > 5.0 {
            Self(5)
        } else {
            // rounded is finite and within [1, 5] here
            Self(rounded as u8)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UnderstandingLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnderstandingLevel> for u8 {
    fn from(level: UnderstandingLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for UnderstandingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Language tag for an optional code snippet on a note.
///
/// Unknown values deserialize to `Plaintext` so stored notes from newer
/// clients never fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Rust,
    Python,
    Javascript,
    Typescript,
    Jsx,
    Tsx,
    Sql,
    Bash,
    Html,
    Css,
    Json,
    Go,
    Java,
    C,
    Cpp,
    #[default]
    #[serde(other)]
    Plaintext,
}

impl CodeLanguage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Jsx => "jsx",
            Self::Tsx => "tsx",
            Self::Sql => "sql",
            Self::Bash => "bash",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Go => "go",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
        }
    }

    /// Parse a stored token, falling back to `Plaintext` for anything
    /// unrecognized (same policy as the serde derive).
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "rust" => Self::Rust,
            "python" => Self::Python,
            "javascript" => Self::Javascript,
            "typescript" => Self::Typescript,
            "jsx" => Self::Jsx,
            "tsx" => Self::Tsx,
            "sql" => Self::Sql,
            "bash" => Self::Bash,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "go" => Self::Go,
            "java" => Self::Java,
            "c" => Self::C,
            "cpp" => Self::Cpp,
            _ => Self::Plaintext,
        }
    }
}

impl std::fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question/answer study note. References its course by id (lookup, not
/// ownership); the course may have been deleted out from under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub course_id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub code_language: CodeLanguage,
    pub understanding_level: UnderstandingLevel,
    #[serde(default)]
    pub flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub course_id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub code_language: CodeLanguage,
    pub understanding_level: UnderstandingLevel,
    #[serde(default)]
    pub flag: bool,
}

/// Partial update for a note. `code_snippet` uses a nested `Option` so the
/// patch can distinguish "leave as is" from "clear the snippet".
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub course_id: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub code_snippet: Option<Option<String>>,
    pub code_language: Option<CodeLanguage>,
    pub understanding_level: Option<UnderstandingLevel>,
    pub flag: Option<bool>,
}

impl NotePatch {
    /// Patch that only changes the understanding level, as issued by the
    /// review session.
    pub fn understanding(level: UnderstandingLevel) -> Self {
        Self { understanding_level: Some(level), ..Self::default() }
    }
}

impl Note {
    /// Merge a patch into this note. The caller refreshes `updated_at`.
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(course_id) = patch.course_id {
            self.course_id = course_id;
        }
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
        if let Some(code_snippet) = patch.code_snippet {
            self.code_snippet = code_snippet;
        }
        if let Some(code_language) = patch.code_language {
            self.code_language = code_language;
        }
        if let Some(level) = patch.understanding_level {
            self.understanding_level = level;
        }
        if let Some(flag) = patch.flag {
            self.flag = flag;
        }
    }

    /// Strip identity and timestamps, keeping the user-supplied fields.
    pub fn into_draft(self) -> NoteDraft {
        NoteDraft {
            course_id: self.course_id,
            question: self.question,
            answer: self.answer,
            code_snippet: self.code_snippet,
            code_language: self.code_language,
            understanding_level: self.understanding_level,
            flag: self.flag,
        }
    }
}

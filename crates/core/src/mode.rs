use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which backend serves this process right now.
///
/// Derived from auth state at each resolution; only the explicit anonymous
/// choice is ever cached, an authenticated session always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Unauthenticated, key-value-backed, single user, offline.
    Local,
    /// Authenticated, PostgreSQL-backed, multi-tenant.
    Remote,
}

impl std::str::FromStr for StorageMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            _ => Err(CoreError::InvalidStorageMode(s.to_owned())),
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

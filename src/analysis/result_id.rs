//! Atomic result_id generation for semantic tokens.
//!
//! Every encoded token array gets a fresh id so a later delta request can
//! name the array it wants to diff against.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static TOKEN_RESULT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of one produced token array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResultId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ResultId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Generate a unique, monotonically increasing result_id for semantic tokens.
///
/// Thread-safe; ids are never reused within a process.
pub fn next_result_id() -> ResultId {
    ResultId(
        TOKEN_RESULT_COUNTER
            .fetch_add(1, Ordering::SeqCst)
            .to_string(),
    )
}

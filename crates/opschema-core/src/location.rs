//! Registration provenance: where in the source a schema was declared.
//!
//! Used only for diagnostics (duplicate registrations, invalid schemas).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Placeholder for schemas built outside any registration site.
    pub fn unknown() -> Self {
        Self::new("unknown", 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.file == "unknown"
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}", self.file, self.line)
    }
}

/// Capture the caller's `file!()`/`line!()` as a `SourceLocation`.
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::location::SourceLocation::new(file!(), line!())
    };
}

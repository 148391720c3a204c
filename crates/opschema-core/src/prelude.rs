//! Convenient re-exports for downstream crates.

pub use crate::config::{SchemaConfig, ValidationMode};
pub use crate::def::{BlobName, OperatorDef, OperatorInstance};
pub use crate::error::{Error, Result};
pub use crate::location::SourceLocation;

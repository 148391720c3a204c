use thiserror::Error;

use opschema_core::location::SourceLocation;

/// Result type local to opschema-registry.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("trying to register schema with name {name} from {location}, but it is already registered from {original}")]
    DuplicateRegistration {
        name: String,
        location: SourceLocation,
        original: SourceLocation,
    },

    #[error("schema {name} from {location}: in-place pair (input {input}, output {output}) is enforced but not allowed")]
    InvalidSchema {
        name: String,
        location: SourceLocation,
        input: usize,
        output: usize,
    },

    #[error("registry configuration: {0}")]
    Config(#[from] opschema_core::error::Error),

    #[error("the process-wide schema registry is already initialized")]
    AlreadyInitialized,

    #[error("the process-wide schema registry has not been initialized")]
    NotInitialized,
}

use thiserror::Error;

/// Why an operator instance does not satisfy its schema.
///
/// Variants follow the order checks run in, so the first one found is the
/// one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{count} inputs given, expected {expected}")]
    InputArity { count: usize, expected: String },

    #[error("{count} outputs given, expected {expected}")]
    OutputArity { count: usize, expected: String },

    #[error("{inputs} inputs should produce {expected} outputs, got {actual}")]
    CalculatorMismatch {
        inputs: usize,
        expected: usize,
        actual: usize,
    },

    #[error("output {output} aliases input {input}, which is not allowed in place")]
    UnauthorizedAlias { input: usize, output: usize },

    #[error("output {output} must alias input {input} in place, but does not")]
    MissingRequiredAlias { input: usize, output: usize },
}

/// A schema that contradicts itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefect {
    #[error("in-place pair (input {input}, output {output}) is enforced but not allowed")]
    EnforcedNotAllowed { input: usize, output: usize },
}

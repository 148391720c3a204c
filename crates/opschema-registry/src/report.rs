//! Per-instance results of batch validation.

use thiserror::Error;

use opschema_rules::SchemaViolation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error(transparent)]
    Violation(#[from] SchemaViolation),

    /// Only reported in strict mode.
    #[error("no schema registered for this operator type")]
    UnknownOperatorType,
}

/// One rejected operator instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operator #{index} ({op_type}{}): {kind}", name_suffix(.name))]
pub struct OperatorReport {
    /// Position of the instance in the validated sequence.
    pub index: usize,
    pub op_type: String,
    /// Instance name; empty when the instance is anonymous.
    pub name: String,
    pub kind: FailureKind,
}

fn name_suffix(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" {name}")
    }
}

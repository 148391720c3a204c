#![forbid(unsafe_code)]
//! opschema: structural contracts for dataflow operators.
//!
//! Re-exports the member crates behind one path:
//! - `opschema-core`: operator instances, provenance, config
//! - `opschema-rules`: `OpSchema`, arity and aliasing constraints, verification
//! - `opschema-registry`: the frozen registry and the process-wide instance

pub use opschema_core;
pub use opschema_registry;
pub use opschema_rules;

pub use opschema_registry::{global, operator_schema, operator_schema_str};

pub mod prelude {
    pub use opschema_core::prelude::*;
    pub use opschema_registry::{
        FailureKind, OperatorReport, SchemaRegistry, SchemaRegistryBuilder,
    };
    pub use opschema_rules::{
        AliasRelation, ArityConstraint, OpSchema, SchemaViolation, CANNOT_COMPUTE_NUM_OUTPUTS,
    };
}

#![forbid(unsafe_code)]
//! opschema-registry: name → `OpSchema` store with an explicit lifecycle.
//!
//! - `SchemaRegistryBuilder` accepts registrations (single owner, `&mut`).
//!   A duplicate name is fatal via `register`, catchable via `try_register`.
//! - `freeze()` checks every schema for self-consistency and yields an
//!   immutable `SchemaRegistry`, which is `Send + Sync` and serves lookups,
//!   verification, and output-count queries.
//! - `global` publishes one frozen registry for the whole process.

pub mod error;
pub mod global;
pub mod metrics;
pub mod registry;
pub mod report;

pub use error::{Error, Result};
pub use opschema_core::location::SourceLocation;
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use report::{FailureKind, OperatorReport};

/// Register a schema under a bare identifier's text, recording the call site
/// as provenance.
///
/// The identifier is stringified, never evaluated: `operator_schema!(b, name)`
/// registers `"name"`. Use `operator_schema_str!` for names held in variables
/// or computed at runtime.
///
/// ```
/// use opschema_registry::{operator_schema, SchemaRegistryBuilder};
///
/// let mut builder = SchemaRegistryBuilder::new();
/// operator_schema!(builder, Relu).num_inputs(1).num_outputs(1);
/// let registry = builder.freeze().unwrap();
/// assert!(registry.lookup("Relu").is_some());
/// ```
#[macro_export]
macro_rules! operator_schema {
    ($builder:expr, $name:ident) => {
        $builder.register(
            stringify!($name),
            $crate::SourceLocation::new(file!(), line!()),
        )
    };
}

/// Register a schema under the value of an `Into<String>` expression,
/// recording the call site as provenance.
///
/// ```
/// use opschema_registry::{operator_schema_str, SchemaRegistryBuilder};
///
/// let mut builder = SchemaRegistryBuilder::new();
/// let op_name = String::from("Sum");
/// operator_schema_str!(builder, op_name).num_inputs_range(1, 8).num_outputs(1);
/// let registry = builder.freeze().unwrap();
/// assert!(registry.lookup("Sum").is_some());
/// ```
#[macro_export]
macro_rules! operator_schema_str {
    ($builder:expr, $name:expr) => {
        $builder.register($name, $crate::SourceLocation::new(file!(), line!()))
    };
}

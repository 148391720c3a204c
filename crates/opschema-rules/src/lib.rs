#![forbid(unsafe_code)]
//! opschema-rules: declarative operator contracts.
//!
//! An `OpSchema` describes, for one operator type:
//! - how many inputs and outputs are acceptable (`ArityConstraint`),
//! - optionally, how the output count follows from the input count,
//! - which (input, output) slot pairs may share storage and which must
//!   (`AliasRelation`).
//!
//! `OpSchema::check`/`verify` test a concrete `OperatorInstance` against it.
//! No globals here; the registry lives in `opschema-registry`.

pub mod alias;
pub mod arity;
pub mod error;
pub mod schema;
pub mod verify;

pub use alias::AliasRelation;
pub use arity::ArityConstraint;
pub use error::{SchemaDefect, SchemaViolation};
pub use schema::{OpSchema, OutputCalculator, CANNOT_COMPUTE_NUM_OUTPUTS};

#![forbid(unsafe_code)]
//! opschema-core: shared vocabulary for operator contracts.
//!
//! Contents:
//! - `def`: the operator-instance seam (`OperatorInstance`) and a concrete,
//!   serde-friendly `OperatorDef` whose slots are blob names.
//! - `location`: registration provenance (`SourceLocation`).
//! - `config`: `SchemaConfig`, loadable from the environment.
//! - `error`: the core `Error`/`Result`.
//!
//! Nothing here knows about arity or aliasing rules; that lives in
//! `opschema-rules`.

pub mod config;
pub mod def;
pub mod error;
pub mod location;
pub mod prelude;

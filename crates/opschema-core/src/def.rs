//! Operator instances as seen by schema checks.
//!
//! A schema only needs three things from an operator instance: its type name,
//! its ordered input slots, and its ordered output slots. Two slots that compare
//! equal denote the same underlying storage (in-place aliasing).
//!
//! `OperatorInstance` is the seam; graph builders with their own node types
//! implement it directly. `OperatorDef` is a plain implementation for tests,
//! fixtures, and callers without a richer representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only view of one operator use inside a dataflow graph.
pub trait OperatorInstance {
    /// Slot identity; equality means "same storage".
    type Slot: PartialEq;

    /// Operator-type name used to look up the schema.
    fn op_type(&self) -> &str;

    /// Ordered input slots.
    fn inputs(&self) -> &[Self::Slot];

    /// Ordered output slots.
    fn outputs(&self) -> &[Self::Slot];

    /// Instance name shown in validation reports; empty when anonymous.
    fn name(&self) -> &str {
        ""
    }

    fn num_inputs(&self) -> usize {
        self.inputs().len()
    }

    fn num_outputs(&self) -> usize {
        self.outputs().len()
    }
}

/// Name of a storage slot (a "blob"). Equal names alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobName(String);

impl BlobName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BlobName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Concrete operator instance: type, optional instance name, blob slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDef {
    #[serde(rename = "type")]
    pub op_type: String,

    /// Instance name, carried into validation reports; empty when anonymous.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub inputs: Vec<BlobName>,

    #[serde(default)]
    pub outputs: Vec<BlobName>,
}

impl OperatorDef {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            name: String::new(),
            inputs: vec![],
            outputs: vec![],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlobName>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlobName>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }
}

impl OperatorInstance for OperatorDef {
    type Slot = BlobName;

    fn op_type(&self) -> &str {
        &self.op_type
    }

    fn inputs(&self) -> &[BlobName] {
        &self.inputs
    }

    fn outputs(&self) -> &[BlobName] {
        &self.outputs
    }

    fn name(&self) -> &str {
        &self.name
    }
}

//! `OpSchema`: the per-operator-type contract and its fluent builder surface.
//!
//! Setters replace the field they target (last write wins) and return `&mut Self`
//! so a freshly registered schema can be configured in one chain:
//!
//! ```
//! use opschema_rules::OpSchema;
//!
//! let mut schema = OpSchema::default();
//! schema.num_inputs(2).num_outputs(1).allow_inplace([(0, 0)]);
//! ```

use std::fmt;
use std::sync::Arc;

use opschema_core::location::SourceLocation;

use crate::alias::AliasRelation;
use crate::arity::ArityConstraint;
use crate::error::SchemaDefect;

/// Returned by `calculate_output_raw` when the output count cannot be determined.
pub const CANNOT_COMPUTE_NUM_OUTPUTS: i64 = -1;

/// Maps an input count to the output count it produces.
pub type OutputCalculator = Arc<dyn Fn(usize) -> usize + Send + Sync>;

#[derive(Clone, Default)]
pub struct OpSchema {
    location: SourceLocation,
    input_arity: ArityConstraint,
    output_arity: ArityConstraint,
    output_calculator: Option<OutputCalculator>,
    inplace_allowed: AliasRelation,
    inplace_enforced: AliasRelation,
}

impl OpSchema {
    /// Unconstrained schema declared at `location`.
    pub fn new(location: SourceLocation) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn file(&self) -> &str {
        &self.location.file
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn input_arity(&self) -> &ArityConstraint {
        &self.input_arity
    }

    pub fn output_arity(&self) -> &ArityConstraint {
        &self.output_arity
    }

    pub fn has_output_calculator(&self) -> bool {
        self.output_calculator.is_some()
    }

    pub fn inplace_allowed(&self) -> &AliasRelation {
        &self.inplace_allowed
    }

    pub fn inplace_enforced(&self) -> &AliasRelation {
        &self.inplace_enforced
    }

    // ----- inputs -----

    pub fn num_inputs(&mut self, n: usize) -> &mut Self {
        self.input_arity = ArityConstraint::exact(n);
        self
    }

    /// Inclusive on both ends.
    pub fn num_inputs_range(&mut self, min: usize, max: usize) -> &mut Self {
        self.input_arity = ArityConstraint::range(min, max);
        self
    }

    pub fn num_inputs_set<I: IntoIterator<Item = usize>>(&mut self, allowed: I) -> &mut Self {
        self.input_arity = ArityConstraint::set(allowed);
        self
    }

    pub fn num_inputs_fn<F>(&mut self, pred: F) -> &mut Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.input_arity = ArityConstraint::custom(pred);
        self
    }

    // ----- outputs -----

    pub fn num_outputs(&mut self, n: usize) -> &mut Self {
        self.output_arity = ArityConstraint::exact(n);
        self
    }

    /// Inclusive on both ends.
    pub fn num_outputs_range(&mut self, min: usize, max: usize) -> &mut Self {
        self.output_arity = ArityConstraint::range(min, max);
        self
    }

    pub fn num_outputs_set<I: IntoIterator<Item = usize>>(&mut self, allowed: I) -> &mut Self {
        self.output_arity = ArityConstraint::set(allowed);
        self
    }

    pub fn num_outputs_fn<F>(&mut self, pred: F) -> &mut Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.output_arity = ArityConstraint::custom(pred);
        self
    }

    // ----- output count -----

    /// When set, the calculator is authoritative for `calculate_output` and for
    /// the output-count check in `verify`. It is not cross-checked against
    /// `num_outputs*`.
    pub fn output_calculator<F>(&mut self, calc: F) -> &mut Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        self.output_calculator = Some(Arc::new(calc));
        self
    }

    pub fn same_number_of_output(&mut self) -> &mut Self {
        self.output_calculator(|n| n)
    }

    // ----- in-place -----

    pub fn allow_inplace<I: IntoIterator<Item = (usize, usize)>>(&mut self, pairs: I) -> &mut Self {
        self.inplace_allowed = AliasRelation::pairs(pairs);
        self
    }

    pub fn allow_inplace_fn<F>(&mut self, pred: F) -> &mut Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.inplace_allowed = AliasRelation::custom(pred);
        self
    }

    pub fn allow_one_to_one_inplace(&mut self) -> &mut Self {
        self.inplace_allowed = AliasRelation::Identity;
        self
    }

    pub fn enforce_inplace<I: IntoIterator<Item = (usize, usize)>>(
        &mut self,
        pairs: I,
    ) -> &mut Self {
        self.inplace_enforced = AliasRelation::pairs(pairs);
        self
    }

    pub fn enforce_inplace_fn<F>(&mut self, pred: F) -> &mut Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.inplace_enforced = AliasRelation::custom(pred);
        self
    }

    pub fn enforce_one_to_one_inplace(&mut self) -> &mut Self {
        self.inplace_enforced = AliasRelation::Identity;
        self
    }

    // ----- queries -----

    /// Output count for `num_input` inputs, or `None` without a calculator.
    pub fn calculate_output(&self, num_input: usize) -> Option<usize> {
        self.output_calculator.as_ref().map(|calc| calc(num_input))
    }

    /// Like `calculate_output`, with `CANNOT_COMPUTE_NUM_OUTPUTS` for `None`.
    /// Computed counts above `i64::MAX` saturate, so they never read as the
    /// sentinel.
    pub fn calculate_output_raw(&self, num_input: usize) -> i64 {
        match self.calculate_output(num_input) {
            Some(n) => i64::try_from(n).unwrap_or(i64::MAX),
            None => CANNOT_COMPUTE_NUM_OUTPUTS,
        }
    }

    /// Check that every enforced in-place pair is also allowed.
    ///
    /// Enumerable enforced sets are checked exactly. Otherwise pairs are probed
    /// with input/output indices below the arity upper bounds, capped at
    /// `probe_limit`; a contradiction only at indices beyond the window is not
    /// detected.
    pub fn validate(&self, probe_limit: usize) -> Result<(), SchemaDefect> {
        match &self.inplace_enforced {
            AliasRelation::Never => Ok(()),
            AliasRelation::Pairs(pairs) => {
                match pairs
                    .iter()
                    .find(|(i, j)| !self.inplace_allowed.holds(*i, *j))
                {
                    Some(&(input, output)) => {
                        Err(SchemaDefect::EnforcedNotAllowed { input, output })
                    }
                    None => Ok(()),
                }
            }
            enforced => {
                let max_in = probe_window(&self.input_arity, probe_limit);
                let max_out = probe_window(&self.output_arity, probe_limit);
                for input in 0..max_in {
                    for output in 0..max_out {
                        if enforced.holds(input, output)
                            && !self.inplace_allowed.holds(input, output)
                        {
                            return Err(SchemaDefect::EnforcedNotAllowed { input, output });
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn probe_window(arity: &ArityConstraint, probe_limit: usize) -> usize {
    arity
        .upper_bound()
        .map_or(probe_limit, |bound| bound.min(probe_limit))
}

impl fmt::Debug for OpSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpSchema")
            .field("location", &self.location)
            .field("input_arity", &self.input_arity)
            .field("output_arity", &self.output_arity)
            .field(
                "output_calculator",
                &self.output_calculator.as_ref().map(|_| "<fn>"),
            )
            .field("inplace_allowed", &self.inplace_allowed)
            .field("inplace_enforced", &self.inplace_enforced)
            .finish()
    }
}

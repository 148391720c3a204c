//! Checking a concrete operator instance against its schema.
//!
//! Order of checks:
//! 1. input count against the input arity,
//! 2. output count against the output arity,
//! 3. output count against the output calculator, when one is set,
//! 4. every (input i, output j) pair: aliased slots must be allowed in place,
//!    non-aliased slots must not be enforced in place.
//!
//! The aliasing pass is what lets an executor overwrite an input buffer with
//! an output safely: undeclared aliasing is rejected and declared-as-required
//! aliasing is guaranteed.

use opschema_core::def::OperatorInstance;

use crate::error::SchemaViolation;
use crate::schema::OpSchema;

impl OpSchema {
    /// First violation of this schema by `def`, if any.
    pub fn check<I: OperatorInstance + ?Sized>(&self, def: &I) -> Result<(), SchemaViolation> {
        let result = self.check_inner(def.inputs(), def.outputs());

        #[cfg(feature = "tracing")]
        trace_rejection(def.op_type(), self, &result);

        result
    }

    /// Boolean form of `check`.
    pub fn verify<I: OperatorInstance + ?Sized>(&self, def: &I) -> bool {
        self.check(def).is_ok()
    }

    fn check_inner<S: PartialEq>(
        &self,
        inputs: &[S],
        outputs: &[S],
    ) -> Result<(), SchemaViolation> {
        let nin = inputs.len();
        let nout = outputs.len();

        if !self.input_arity().allows(nin) {
            return Err(SchemaViolation::InputArity {
                count: nin,
                expected: self.input_arity().to_string(),
            });
        }

        if !self.output_arity().allows(nout) {
            return Err(SchemaViolation::OutputArity {
                count: nout,
                expected: self.output_arity().to_string(),
            });
        }

        if let Some(expected) = self.calculate_output(nin) {
            if expected != nout {
                return Err(SchemaViolation::CalculatorMismatch {
                    inputs: nin,
                    expected,
                    actual: nout,
                });
            }
        }

        for (input, in_slot) in inputs.iter().enumerate() {
            for (output, out_slot) in outputs.iter().enumerate() {
                let aliased = in_slot == out_slot;
                if aliased && !self.inplace_allowed().holds(input, output) {
                    return Err(SchemaViolation::UnauthorizedAlias { input, output });
                }
                if !aliased && self.inplace_enforced().holds(input, output) {
                    return Err(SchemaViolation::MissingRequiredAlias { input, output });
                }
            }
        }

        Ok(())
    }
}

#[cfg(feature = "tracing")]
fn trace_rejection(op_type: &str, schema: &OpSchema, result: &Result<(), SchemaViolation>) {
    if let Err(violation) = result {
        tracing::trace!(
            op_type,
            schema = %schema.location(),
            %violation,
            "operator instance rejected"
        );
    }
}

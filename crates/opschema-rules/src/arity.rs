//! Constraints over an input or output slot count.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Arbitrary count predicate.
pub type CountPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Which slot counts an operator accepts on one side (inputs or outputs).
///
/// The common shapes stay introspectable; `Custom` is the escape hatch.
#[derive(Clone, Default)]
pub enum ArityConstraint {
    /// Any count, the default.
    #[default]
    Any,
    Exact(usize),
    /// Inclusive on both ends.
    Range { min: usize, max: usize },
    Set(BTreeSet<usize>),
    Custom(CountPredicate),
}

impl ArityConstraint {
    pub fn exact(n: usize) -> Self {
        Self::Exact(n)
    }

    pub fn range(min: usize, max: usize) -> Self {
        Self::Range { min, max }
    }

    pub fn set<I: IntoIterator<Item = usize>>(values: I) -> Self {
        Self::Set(values.into_iter().collect())
    }

    pub fn custom<F>(pred: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(pred))
    }

    /// Does `count` satisfy this constraint?
    pub fn allows(&self, count: usize) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(n) => count == *n,
            Self::Range { min, max } => *min <= count && count <= *max,
            Self::Set(values) => values.contains(&count),
            Self::Custom(pred) => pred(count),
        }
    }

    /// Largest admissible count, when it is statically known.
    ///
    /// `Custom` and `Any` have no known bound. An empty set or an inverted range
    /// admits nothing and reports `Some(0)`.
    pub fn upper_bound(&self) -> Option<usize> {
        match self {
            Self::Any | Self::Custom(_) => None,
            Self::Exact(n) => Some(*n),
            Self::Range { min, max } if min > max => Some(0),
            Self::Range { max, .. } => Some(*max),
            Self::Set(values) => Some(values.iter().next_back().copied().unwrap_or(0)),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Debug for ArityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Exact(n) => f.debug_tuple("Exact").field(n).finish(),
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Set(values) => f.debug_tuple("Set").field(values).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl fmt::Display for ArityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any count"),
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::Range { min, max } => write!(f, "between {min} and {max}"),
            Self::Set(values) => {
                f.write_str("one of {")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("}")
            }
            Self::Custom(_) => f.write_str("a count accepted by a custom predicate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_everything() {
        let c = ArityConstraint::default();
        assert!(c.allows(0));
        assert!(c.allows(usize::MAX));
        assert_eq!(c.upper_bound(), None);
    }

    #[test]
    fn test_range_is_inclusive() {
        let c = ArityConstraint::range(1, 3);
        assert!(!c.allows(0));
        assert!(c.allows(1));
        assert!(c.allows(3));
        assert!(!c.allows(4));
        assert_eq!(c.upper_bound(), Some(3));
    }

    #[test]
    fn test_inverted_range_admits_nothing() {
        let c = ArityConstraint::range(3, 1);
        assert!((0..8).all(|n| !c.allows(n)));
        assert_eq!(c.upper_bound(), Some(0));
    }

    #[test]
    fn test_set_membership_and_bound() {
        let c = ArityConstraint::set([1, 2, 5]);
        assert!(c.allows(5));
        assert!(!c.allows(3));
        assert_eq!(c.upper_bound(), Some(5));
        assert_eq!(ArityConstraint::set([]).upper_bound(), Some(0));
    }

    #[test]
    fn test_custom_predicate() {
        let even = ArityConstraint::custom(|n| n % 2 == 0);
        assert!(even.allows(0));
        assert!(even.allows(4));
        assert!(!even.allows(3));
        assert!(even.is_custom());
        assert_eq!(format!("{even:?}"), "Custom(<fn>)");
    }

    #[test]
    fn test_display() {
        assert_eq!(ArityConstraint::exact(2).to_string(), "exactly 2");
        assert_eq!(ArityConstraint::range(1, 3).to_string(), "between 1 and 3");
        assert_eq!(ArityConstraint::set([3, 1, 2]).to_string(), "one of {1, 2, 3}");
    }
}

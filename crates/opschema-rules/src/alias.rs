//! Relations over (input index, output index) pairs, used for in-place aliasing.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Arbitrary pair predicate over (input index, output index).
pub type PairPredicate = Arc<dyn Fn(usize, usize) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub enum AliasRelation {
    /// Holds for no pair, the default.
    #[default]
    Never,
    /// Holds when input index == output index.
    Identity,
    Pairs(BTreeSet<(usize, usize)>),
    Custom(PairPredicate),
}

impl AliasRelation {
    pub fn pairs<I: IntoIterator<Item = (usize, usize)>>(pairs: I) -> Self {
        Self::Pairs(pairs.into_iter().collect())
    }

    pub fn custom<F>(pred: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(pred))
    }

    pub fn holds(&self, input: usize, output: usize) -> bool {
        match self {
            Self::Never => false,
            Self::Identity => input == output,
            Self::Pairs(pairs) => pairs.contains(&(input, output)),
            Self::Custom(pred) => pred(input, output),
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }
}

impl fmt::Debug for AliasRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Identity => f.write_str("Identity"),
            Self::Pairs(pairs) => f.debug_tuple("Pairs").field(pairs).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl fmt::Display for AliasRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("no pairs"),
            Self::Identity => f.write_str("one-to-one pairs"),
            Self::Pairs(pairs) => {
                f.write_str("{")?;
                for (k, (i, j)) in pairs.iter().enumerate() {
                    if k > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "({i}, {j})")?;
                }
                f.write_str("}")
            }
            Self::Custom(_) => f.write_str("pairs accepted by a custom predicate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_and_identity() {
        assert!(!AliasRelation::default().holds(0, 0));
        assert!(AliasRelation::Identity.holds(2, 2));
        assert!(!AliasRelation::Identity.holds(1, 0));
    }

    #[test]
    fn test_pairs() {
        let rel = AliasRelation::pairs([(0, 0), (1, 0)]);
        assert!(rel.holds(1, 0));
        assert!(!rel.holds(0, 1));
        assert_eq!(rel.to_string(), "{(0, 0), (1, 0)}");
    }

    #[test]
    fn test_custom() {
        let rel = AliasRelation::custom(|i, _| i == 0);
        assert!(rel.holds(0, 5));
        assert!(!rel.holds(1, 0));
    }
}

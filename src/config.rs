use crate::{Error, Result};

/// Degree used when none is given, or when a non-positive degree is coerced.
pub const DEFAULT_DEGREE: i64 = 32;

/// Smallest degree that yields a valid tree ( 3 items max, 1 item min ).
pub const MIN_DEGREE: i64 = 2;

/// Per-node item bounds derived from a degree `d`: `max = 2d - 1`, `min = max / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Effective degree after any coercion.
    pub degree: usize,
    /// Minimum items in a non-root node.
    pub min: usize,
    /// Maximum items in any node.
    pub max: usize,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_degree(DEFAULT_DEGREE)
    }
}

impl Bounds {
    /// Derive bounds, coercing a degree <= 0 to [`DEFAULT_DEGREE`] and a degree of 1 to [`MIN_DEGREE`].
    #[must_use]
    pub fn from_degree(degree: i64) -> Self {
        let effective = match degree {
            d if d <= 0 => DEFAULT_DEGREE,
            1 => MIN_DEGREE,
            d => d,
        };
        if effective != degree {
            tracing::debug!(degree, effective, "coerced b-tree degree");
        }
        Self::derive(effective)
    }

    /// Derive bounds, rejecting any degree below [`MIN_DEGREE`].
    pub fn try_from_degree(degree: i64) -> Result<Self> {
        if degree < MIN_DEGREE {
            return Err(Error::InvalidDegree(degree));
        }
        Ok(Self::derive(degree))
    }

    fn derive(degree: i64) -> Self {
        let degree = usize::try_from(degree).unwrap_or(usize::MAX / 2);
        let max = 2 * degree - 1;
        Self {
            degree,
            min: max / 2,
            max,
        }
    }
}

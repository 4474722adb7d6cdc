use thiserror::Error;

/// Result type returned by fallible [`BTree`](crate::BTree) operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for [`BTree`](crate::BTree) operations.
///
/// A missing key is not an error, lookups and removals return `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The comparator could not order a pair of keys (for example a NaN float).
    #[error("comparator could not order keys")]
    IncomparableKey,

    /// Degree rejected by a strict constructor, it must be at least 2.
    #[error("invalid degree {0}, must be at least 2")]
    InvalidDegree(i64),
}

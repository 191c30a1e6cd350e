use thiserror::Error;

/// Errors reported by [`crate::sort`] and [`crate::sort_by`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// `lo > hi` or `hi` past the end of the key column. Nothing was touched.
    #[error("invalid sort range {lo}..{hi} for a key column of length {len}")]
    InvalidRange { lo: usize, hi: usize, len: usize },

    /// A companion column is not as long as the key column. Nothing was touched.
    #[error("companion column has length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The comparator is not a consistent total order.
    ///
    /// Detected in the middle of a merge. Merges finished before this one are
    /// intact, the interrupted one is abandoned.
    #[error("comparison method violates its general contract")]
    ComparatorViolation,
}

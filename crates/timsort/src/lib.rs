//! Stable, adaptive TimSort over a key column, permuting any number of
//! companion columns in lockstep with the keys.

mod buffer;
mod columns;
mod driver;
mod error;
mod gallop;
mod merge;
mod run;
mod stack;

pub use columns::{ColumnSet, Columns};
pub use error::SortError;

/// Ranges shorter than this are sorted with a single binary insertion sort.
pub const MIN_MERGE: usize = 32;
/// Initial number of consecutive wins that switches a merge to galloping.
pub const MIN_GALLOP: usize = 7;
/// Merge scratch capacity reserved up front, in rows. Ranges shorter than
/// twice this start with half their length instead.
pub const INITIAL_TMP_STORAGE_LENGTH: usize = 256;

#[derive(Clone, Copy, Debug)]
pub struct TimsortParams {
    pub min_merge: usize,
    pub min_gallop: usize,
    pub initial_tmp_storage_length: usize,
}

pub const TIMSORT_PARAMS: TimsortParams = TimsortParams {
    min_merge: MIN_MERGE,
    min_gallop: MIN_GALLOP,
    initial_tmp_storage_length: INITIAL_TMP_STORAGE_LENGTH,
};

/// Sorts `keys[lo..hi]` ascending and applies the same permutation to rows
/// `lo..hi` of every column in `data`.
///
/// The sort is stable. Rows outside `lo..hi` are never touched. Range and
/// column length problems are reported before anything is moved.
///
/// ```
/// let mut keys = vec![5, 3, 4, 1, 2];
/// let mut names = vec!["e", "c", "d", "a", "b"];
/// timsort::sort(&mut keys, &mut names, 0, 5)?;
/// assert_eq!(names, ["a", "b", "c", "d", "e"]);
/// # Ok::<(), timsort::SortError>(())
/// ```
pub fn sort<K, C>(keys: &mut [K], data: &mut C, lo: usize, hi: usize) -> Result<(), SortError>
where
    K: Ord + Clone,
    C: Columns + ?Sized,
{
    sort_by(keys, data, lo, hi, |a, b| a < b)
}

/// Like [`sort`], ordering keys by the strict predicate `is_less`.
///
/// `is_less` must describe a strict weak order. When it does not, the sort
/// either finishes with an unspecified (but still permuted) order or returns
/// [`SortError::ComparatorViolation`] as soon as a merge notices.
pub fn sort_by<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    lo: usize,
    hi: usize,
    mut is_less: F,
) -> Result<(), SortError>
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    let len = keys.len();
    if lo > hi || hi > len {
        return Err(SortError::InvalidRange { lo, hi, len });
    }
    if let Some(actual) = data.mismatched_len(len) {
        return Err(SortError::LengthMismatch {
            expected: len,
            actual,
        });
    }

    driver::sort_range(keys, data, lo, hi, &mut is_less)
}

pub fn sort_all<K, C>(keys: &mut [K], data: &mut C) -> Result<(), SortError>
where
    K: Ord + Clone,
    C: Columns + ?Sized,
{
    let len = keys.len();
    sort(keys, data, 0, len)
}

pub fn sort_keys<K: Ord + Clone>(keys: &mut [K]) -> Result<(), SortError> {
    sort_all(keys, &mut ())
}

use tracing::debug;

use crate::TIMSORT_PARAMS;
use crate::columns::Columns;
use crate::error::SortError;
use crate::merge::MergeState;
use crate::run::{binary_sort, count_run_and_make_ascending, min_run_length};
use crate::stack::{Run, RunStack};

/// Sorts `keys[lo..hi]` and the same rows of `data`. The range has already
/// been validated against both.
pub(crate) fn sort_range<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    lo: usize,
    hi: usize,
    is_less: &mut F,
) -> Result<(), SortError>
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    let len = hi - lo;
    if len < 2 {
        return Ok(());
    }

    if len < TIMSORT_PARAMS.min_merge {
        let init_run = count_run_and_make_ascending(keys, data, lo, hi, is_less);
        binary_sort(keys, data, lo, hi, lo + init_run, is_less);
        return Ok(());
    }

    let mut state = MergeState::new(len, data);
    let mut stack = RunStack::with_capacity_for(len);
    let min_run = min_run_length(len);
    debug!(lo, len, min_run, "timsort");

    let mut cursor = lo;
    let mut remaining = len;
    while remaining != 0 {
        let mut run_len = count_run_and_make_ascending(keys, data, cursor, hi, is_less);
        if run_len < min_run {
            let forced = remaining.min(min_run);
            binary_sort(keys, data, cursor, cursor + forced, cursor + run_len, is_less);
            run_len = forced;
        }

        stack.push_run(cursor, run_len);
        stack.merge_collapse(keys, data, &mut state, is_less)?;

        cursor += run_len;
        remaining -= run_len;
    }
    debug_assert_eq!(cursor, hi);

    stack.merge_force_collapse(keys, data, &mut state, is_less)?;
    debug_assert_eq!(stack.runs(), [Run { base: lo, len }]);
    Ok(())
}

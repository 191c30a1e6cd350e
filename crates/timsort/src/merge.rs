use tracing::{debug, trace};

use crate::buffer::ScratchBuffers;
use crate::columns::Columns;
use crate::error::SortError;
use crate::gallop::{gallop_left, gallop_right};
use crate::stack::Run;
use crate::TIMSORT_PARAMS;

/// State threaded through every merge of one sort call.
pub(crate) struct MergeState<K, S> {
    /// Consecutive wins needed before a merge switches to galloping.
    pub(crate) min_gallop: usize,
    pub(crate) buffers: ScratchBuffers<K, S>,
}

impl<K: Clone, S: Default> MergeState<K, S> {
    pub(crate) fn new<C>(range_len: usize, data: &mut C) -> Self
    where
        C: Columns<Scratch = S> + ?Sized,
    {
        Self {
            min_gallop: TIMSORT_PARAMS.min_gallop,
            buffers: ScratchBuffers::new(range_len, data),
        }
    }
}

#[inline]
fn copy_rows<K, C>(keys: &mut [K], data: &mut C, src: usize, dst: usize, n: usize)
where
    K: Clone,
    C: Columns + ?Sized,
{
    keys.copy_rows(src, dst, n);
    data.copy_rows(src, dst, n);
}

/// Merges the adjacent sorted runs `run1` and `run2` in place.
///
/// Rows of `run1` already in final position and rows of `run2` already in
/// final position are trimmed off first; the rest goes through merge-lo or
/// merge-hi depending on which side is shorter.
pub(crate) fn merge_runs<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    state: &mut MergeState<K, C::Scratch>,
    is_less: &mut F,
    run1: Run,
    run2: Run,
) -> Result<(), SortError>
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    debug_assert!(run1.len > 0 && run2.len > 0);
    debug_assert_eq!(run1.base + run1.len, run2.base);

    let skip = gallop_right(
        &keys[run2.base],
        &keys[run1.base..run1.base + run1.len],
        0,
        is_less,
    );
    let run1 = Run {
        base: run1.base + skip,
        len: run1.len - skip,
    };
    if run1.len == 0 {
        return Ok(());
    }

    let len2 = gallop_left(
        &keys[run1.base + run1.len - 1],
        &keys[run2.base..run2.base + run2.len],
        run2.len - 1,
        is_less,
    );
    let run2 = Run {
        base: run2.base,
        len: len2,
    };
    if run2.len == 0 {
        return Ok(());
    }

    if run1.len <= run2.len {
        trace!(base = run1.base, len1 = run1.len, len2 = run2.len, strategy = "lo", "merge");
        state.buffers.ensure_capacity(data, run1.len);
        merge_lo(keys, data, state, is_less, run1, run2)
    } else {
        trace!(base = run1.base, len1 = run1.len, len2 = run2.len, strategy = "hi", "merge");
        state.buffers.ensure_capacity(data, run2.len);
        merge_hi(keys, data, state, is_less, run1, run2)
    }
}

/// Forward merge for `run1.len <= run2.len`.
///
/// `run1` moves to scratch and the output is written left to right over
/// `run1 ++ run2`. Ties take the scratch (left) row.
fn merge_lo<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    state: &mut MergeState<K, C::Scratch>,
    is_less: &mut F,
    run1: Run,
    run2: Run,
) -> Result<(), SortError>
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    let Run {
        base: base1,
        len: mut len1,
    } = run1;
    let Run {
        base: base2,
        len: mut len2,
    } = run2;
    debug_assert!(len1 > 0 && len2 > 0 && base1 + len1 == base2);

    let tmp = &mut state.buffers;
    tmp.stash(keys, data, base1, len1);

    let mut cursor1 = 0;
    let mut cursor2 = base2;
    let mut dest = base1;

    // The first row of run2 sorts before all of run1 after trimming.
    copy_rows(keys, data, cursor2, dest, 1);
    cursor2 += 1;
    dest += 1;
    len2 -= 1;
    if len2 == 0 {
        tmp.restore(keys, data, cursor1, dest, len1);
        return Ok(());
    }
    if len1 == 1 {
        copy_rows(keys, data, cursor2, dest, len2);
        tmp.restore(keys, data, cursor1, dest + len2, 1);
        return Ok(());
    }

    let mut min_gallop = state.min_gallop;
    'outer: loop {
        let mut count1 = 0;
        let mut count2 = 0;

        loop {
            debug_assert!(len1 > 1 && len2 > 0);
            if is_less(&keys[cursor2], &tmp.keys[cursor1]) {
                copy_rows(keys, data, cursor2, dest, 1);
                cursor2 += 1;
                dest += 1;
                count2 += 1;
                count1 = 0;
                len2 -= 1;
                if len2 == 0 {
                    break 'outer;
                }
            } else {
                tmp.restore(keys, data, cursor1, dest, 1);
                cursor1 += 1;
                dest += 1;
                count1 += 1;
                count2 = 0;
                len1 -= 1;
                if len1 == 1 {
                    break 'outer;
                }
            }
            if (count1 | count2) >= min_gallop {
                break;
            }
        }

        loop {
            debug_assert!(len1 > 1 && len2 > 0);
            count1 = gallop_right(
                &keys[cursor2],
                &tmp.keys[cursor1..cursor1 + len1],
                0,
                is_less,
            );
            if count1 != 0 {
                tmp.restore(keys, data, cursor1, dest, count1);
                dest += count1;
                cursor1 += count1;
                len1 -= count1;
                if len1 <= 1 {
                    break 'outer;
                }
            }
            copy_rows(keys, data, cursor2, dest, 1);
            cursor2 += 1;
            dest += 1;
            len2 -= 1;
            if len2 == 0 {
                break 'outer;
            }

            count2 = gallop_left(
                &tmp.keys[cursor1],
                &keys[cursor2..cursor2 + len2],
                0,
                is_less,
            );
            if count2 != 0 {
                copy_rows(keys, data, cursor2, dest, count2);
                dest += count2;
                cursor2 += count2;
                len2 -= count2;
                if len2 == 0 {
                    break 'outer;
                }
            }
            tmp.restore(keys, data, cursor1, dest, 1);
            cursor1 += 1;
            dest += 1;
            len1 -= 1;
            if len1 == 1 {
                break 'outer;
            }

            min_gallop = min_gallop.saturating_sub(1);
            if count1 < TIMSORT_PARAMS.min_gallop && count2 < TIMSORT_PARAMS.min_gallop {
                break;
            }
        }
        min_gallop += 2;
    }
    state.min_gallop = min_gallop.max(1);

    if len1 == 1 {
        debug_assert!(len2 > 0);
        copy_rows(keys, data, cursor2, dest, len2);
        tmp.restore(keys, data, cursor1, dest + len2, 1);
        Ok(())
    } else if len1 == 0 {
        debug!(base = base1, len2, "merge_lo ran out of left rows");
        Err(SortError::ComparatorViolation)
    } else {
        debug_assert!(len2 == 0 && len1 > 1);
        tmp.restore(keys, data, cursor1, dest, len1);
        Ok(())
    }
}

/// Backward merge for `run1.len > run2.len`.
///
/// `run2` moves to scratch and the output is written right to left. With
/// `len1` and `len2` rows left on each side, the unmerged part of run1 is
/// `base1..base1 + len1`, the unmerged part of scratch is `0..len2`, and the
/// next output slot is `base1 + len1 + len2 - 1`. Ties take the run1 (left)
/// row last, i.e. the scratch row is written first.
fn merge_hi<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    state: &mut MergeState<K, C::Scratch>,
    is_less: &mut F,
    run1: Run,
    run2: Run,
) -> Result<(), SortError>
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    let Run {
        base: base1,
        len: mut len1,
    } = run1;
    let Run {
        base: base2,
        len: mut len2,
    } = run2;
    debug_assert!(len1 > 0 && len2 > 0 && base1 + len1 == base2);

    let tmp = &mut state.buffers;
    tmp.stash(keys, data, base2, len2);

    // The last row of run1 sorts after all of run2 after trimming.
    copy_rows(keys, data, base1 + len1 - 1, base1 + len1 + len2 - 1, 1);
    len1 -= 1;
    if len1 == 0 {
        tmp.restore(keys, data, 0, base1, len2);
        return Ok(());
    }
    if len2 == 1 {
        copy_rows(keys, data, base1, base1 + 1, len1);
        tmp.restore(keys, data, 0, base1, 1);
        return Ok(());
    }

    let mut min_gallop = state.min_gallop;
    'outer: loop {
        let mut count1 = 0;
        let mut count2 = 0;

        loop {
            debug_assert!(len1 > 0 && len2 > 1);
            let cursor1 = base1 + len1 - 1;
            let cursor2 = len2 - 1;
            let dest = base1 + len1 + len2 - 1;
            if is_less(&tmp.keys[cursor2], &keys[cursor1]) {
                copy_rows(keys, data, cursor1, dest, 1);
                count1 += 1;
                count2 = 0;
                len1 -= 1;
                if len1 == 0 {
                    break 'outer;
                }
            } else {
                tmp.restore(keys, data, cursor2, dest, 1);
                count2 += 1;
                count1 = 0;
                len2 -= 1;
                if len2 == 1 {
                    break 'outer;
                }
            }
            if (count1 | count2) >= min_gallop {
                break;
            }
        }

        loop {
            debug_assert!(len1 > 0 && len2 > 1);
            count1 = len1
                - gallop_right(
                    &tmp.keys[len2 - 1],
                    &keys[base1..base1 + len1],
                    len1 - 1,
                    is_less,
                );
            if count1 != 0 {
                len1 -= count1;
                copy_rows(keys, data, base1 + len1, base1 + len1 + len2, count1);
                if len1 == 0 {
                    break 'outer;
                }
            }
            tmp.restore(keys, data, len2 - 1, base1 + len1 + len2 - 1, 1);
            len2 -= 1;
            if len2 == 1 {
                break 'outer;
            }

            count2 = len2
                - gallop_left(
                    &keys[base1 + len1 - 1],
                    &tmp.keys[..len2],
                    len2 - 1,
                    is_less,
                );
            if count2 != 0 {
                len2 -= count2;
                tmp.restore(keys, data, len2, base1 + len1 + len2, count2);
                if len2 <= 1 {
                    break 'outer;
                }
            }
            copy_rows(keys, data, base1 + len1 - 1, base1 + len1 + len2 - 1, 1);
            len1 -= 1;
            if len1 == 0 {
                break 'outer;
            }

            min_gallop = min_gallop.saturating_sub(1);
            if count1 < TIMSORT_PARAMS.min_gallop && count2 < TIMSORT_PARAMS.min_gallop {
                break;
            }
        }
        min_gallop += 2;
    }
    state.min_gallop = min_gallop.max(1);

    if len2 == 1 {
        debug_assert!(len1 > 0);
        copy_rows(keys, data, base1, base1 + 1, len1);
        tmp.restore(keys, data, 0, base1, 1);
        Ok(())
    } else if len2 == 0 {
        debug!(base = base1, len1, "merge_hi ran out of right rows");
        Err(SortError::ComparatorViolation)
    } else {
        debug_assert!(len1 == 0 && len2 > 1);
        tmp.restore(keys, data, 0, base1, len2);
        Ok(())
    }
}

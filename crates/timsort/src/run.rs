use crate::TIMSORT_PARAMS;
use crate::columns::Columns;

/// Minimum run length for a range of `n` rows.
///
/// Shifts `n` right until it drops below `MIN_MERGE`, remembering whether any
/// set bit was shifted out. The result lies in `MIN_MERGE / 2..=MIN_MERGE`
/// and makes `n / min_run` a power of two or slightly less.
pub(crate) fn min_run_length(mut n: usize) -> usize {
    let mut r = 0;
    while n >= TIMSORT_PARAMS.min_merge {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

/// Length of the run starting at `lo`, reversing it first if it is strictly
/// descending.
///
/// Equal neighbours never count as descending, so reversal cannot reorder
/// equal keys.
pub(crate) fn count_run_and_make_ascending<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    lo: usize,
    hi: usize,
    is_less: &mut F,
) -> usize
where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    debug_assert!(lo < hi);

    let mut run_hi = lo + 1;
    if run_hi == hi {
        return 1;
    }

    if is_less(&keys[run_hi], &keys[lo]) {
        run_hi += 1;
        while run_hi < hi && is_less(&keys[run_hi], &keys[run_hi - 1]) {
            run_hi += 1;
        }
        reverse_range(keys, data, lo, run_hi);
    } else {
        run_hi += 1;
        while run_hi < hi && !is_less(&keys[run_hi], &keys[run_hi - 1]) {
            run_hi += 1;
        }
    }

    run_hi - lo
}

fn reverse_range<K, C>(keys: &mut [K], data: &mut C, mut lo: usize, hi: usize)
where
    C: Columns + ?Sized,
{
    let mut hi = hi - 1;
    while lo < hi {
        keys.swap(lo, hi);
        data.swap_rows(lo, hi);
        lo += 1;
        hi -= 1;
    }
}

/// Sorts `lo..hi` given that `lo..start` is already sorted.
///
/// Each new row goes after every equal row already placed, which keeps the
/// sort stable. Only used on ranges shorter than `MIN_MERGE`.
pub(crate) fn binary_sort<K, C, F>(
    keys: &mut [K],
    data: &mut C,
    lo: usize,
    hi: usize,
    start: usize,
    is_less: &mut F,
) where
    K: Clone,
    C: Columns + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    debug_assert!(lo <= start && start <= hi);

    let mut start = if start == lo { start + 1 } else { start };
    while start < hi {
        let pivot = &keys[start];
        let mut left = lo;
        let mut right = start;
        while left < right {
            let mid = left + ((right - left) >> 1);
            if is_less(pivot, &keys[mid]) {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        keys.shift_insert(left, start + 1);
        data.shift_insert(left, start + 1);
        start += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{binary_sort, count_run_and_make_ascending, min_run_length};

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn min_run_length_bit_trick() {
        assert_eq!(min_run_length(0), 0);
        assert_eq!(min_run_length(31), 31);
        assert_eq!(min_run_length(32), 16);
        assert_eq!(min_run_length(33), 17);
        assert_eq!(min_run_length(64), 16);
        assert_eq!(min_run_length(65), 17);
        assert_eq!(min_run_length(1000), 32);
        assert_eq!(min_run_length(1024), 16);
        assert_eq!(min_run_length(100_000), 25);
        for n in 32..5000 {
            let r = min_run_length(n);
            assert!((16..=32).contains(&r), "n={n} r={r}");
        }
    }

    #[test]
    fn ascending_run_with_ties() {
        let mut keys = vec![1, 2, 2, 3, 1, 5];
        let mut ids = vec![0, 1, 2, 3, 4, 5];
        let len = count_run_and_make_ascending(&mut keys, &mut ids, 0, 6, &mut less);
        assert_eq!(len, 4);
        assert_eq!(ids, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn descending_run_is_reversed_with_companions() {
        let mut keys = vec![9, 7, 4, 4, 1];
        let mut ids = vec![0, 1, 2, 3, 4];
        let len = count_run_and_make_ascending(&mut keys, &mut ids, 0, 5, &mut less);
        // The tie at 4, 4 ends the strictly descending run.
        assert_eq!(len, 3);
        assert_eq!(keys, [4, 7, 9, 4, 1]);
        assert_eq!(ids, [2, 1, 0, 3, 4]);
    }

    #[test]
    fn run_respects_bounds() {
        let mut keys = vec![5, 4, 3, 2, 1];
        let len = count_run_and_make_ascending(&mut keys, &mut (), 1, 4, &mut less);
        assert_eq!(len, 3);
        assert_eq!(keys, [5, 2, 3, 4, 1]);

        let len = count_run_and_make_ascending(&mut keys, &mut (), 4, 5, &mut less);
        assert_eq!(len, 1);
    }

    #[test]
    fn binary_sort_is_stable() {
        let mut keys = vec![3, 1, 2, 1, 3, 2, 1];
        let mut ids = vec![0, 1, 2, 3, 4, 5, 6];
        binary_sort(&mut keys, &mut ids, 0, 7, 1, &mut less);
        assert_eq!(keys, [1, 1, 1, 2, 2, 3, 3]);
        assert_eq!(ids, [1, 3, 6, 2, 5, 0, 4]);
    }

    #[test]
    fn binary_sort_extends_sorted_prefix_only_inside_range() {
        let mut keys = vec![100, 2, 4, 6, 5, 1, 3, -1];
        let mut ids: Vec<usize> = (0..keys.len()).collect();
        binary_sort(&mut keys, &mut ids, 1, 7, 4, &mut less);
        assert_eq!(keys, [100, 1, 2, 3, 4, 5, 6, -1]);
        assert_eq!(ids, [0, 5, 1, 6, 2, 4, 3, 7]);
    }
}

//! Exponential-then-binary searches over a sorted run.
//!
//! Both searches start probing at `hint` and widen the probe step as
//! `(step << 1) + 1` until the answer is bracketed, then binary search inside
//! the bracket. They differ only in how equal elements are treated:
//! [`gallop_left`] lands before them, [`gallop_right`] lands after them.

/// Leftmost index `i` in `run` with `!(run[i] < key)`, i.e. `key <= run[i]`.
///
/// Elements equal to `key` end up to the right of the returned position.
pub(crate) fn gallop_left<K, F>(key: &K, run: &[K], hint: usize, is_less: &mut F) -> usize
where
    F: FnMut(&K, &K) -> bool,
{
    let len = run.len();
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs = 0;
    let mut ofs = 1;
    let (mut lo, mut hi);
    if is_less(&run[hint], key) {
        // run[hint] < key: gallop right until run[hint + last_ofs] < key <= run[hint + ofs].
        let max_ofs = len - hint;
        while ofs < max_ofs && is_less(&run[hint + ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    } else {
        // key <= run[hint]: gallop left until run[hint - ofs] < key <= run[hint - last_ofs].
        let max_ofs = hint + 1;
        while ofs < max_ofs && !is_less(&run[hint - ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    }
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(&run[mid], key) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    hi
}

/// Leftmost index `i` in `run` with `key < run[i]`.
///
/// Elements equal to `key` end up to the left of the returned position.
pub(crate) fn gallop_right<K, F>(key: &K, run: &[K], hint: usize, is_less: &mut F) -> usize
where
    F: FnMut(&K, &K) -> bool,
{
    let len = run.len();
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs = 0;
    let mut ofs = 1;
    let (mut lo, mut hi);
    if is_less(key, &run[hint]) {
        // key < run[hint]: gallop left until run[hint - ofs] <= key < run[hint - last_ofs].
        let max_ofs = hint + 1;
        while ofs < max_ofs && is_less(key, &run[hint - ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    } else {
        // run[hint] <= key: gallop right until run[hint + last_ofs] <= key < run[hint + ofs].
        let max_ofs = len - hint;
        while ofs < max_ofs && !is_less(key, &run[hint + ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    }
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(key, &run[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    hi
}

use crate::TIMSORT_PARAMS;
use crate::columns::Columns;

/// Merge scratch space for the key column and every companion column.
///
/// `tmp_len` is the capacity the growth policy has granted so far; the
/// buffers themselves are reloaded for every merge and never shrink.
pub(crate) struct ScratchBuffers<K, S> {
    pub(crate) keys: Vec<K>,
    pub(crate) data: S,
    tmp_len: usize,
    range_len: usize,
}

impl<K: Clone, S: Default> ScratchBuffers<K, S> {
    pub(crate) fn new<C>(range_len: usize, data: &mut C) -> Self
    where
        C: Columns<Scratch = S> + ?Sized,
    {
        let tmp_len = initial_capacity(range_len);
        let mut buffers = Self {
            keys: Vec::with_capacity(tmp_len),
            data: S::default(),
            tmp_len,
            range_len,
        };
        data.reserve_scratch(&mut buffers.data, tmp_len);
        buffers
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.tmp_len
    }

    pub(crate) fn ensure_capacity<C>(&mut self, data: &mut C, min_capacity: usize)
    where
        C: Columns<Scratch = S> + ?Sized,
    {
        if self.tmp_len >= min_capacity {
            return;
        }

        let new_len = grown_capacity(min_capacity, self.range_len);
        if self.keys.capacity() < new_len {
            self.keys.reserve_exact(new_len - self.keys.len());
        }
        data.reserve_scratch(&mut self.data, new_len);
        self.tmp_len = new_len;
    }

    /// Loads rows `base..base + n` of keys and companions into scratch.
    #[inline]
    pub(crate) fn stash<C>(&mut self, keys: &mut [K], data: &mut C, base: usize, n: usize)
    where
        C: Columns<Scratch = S> + ?Sized,
    {
        debug_assert!(n <= self.capacity());
        keys.stash_rows(&mut self.keys, base, n);
        data.stash_rows(&mut self.data, base, n);
    }

    /// Writes scratch rows `src..src + n` back to rows `dst..dst + n`.
    #[inline]
    pub(crate) fn restore<C>(&self, keys: &mut [K], data: &mut C, src: usize, dst: usize, n: usize)
    where
        C: Columns<Scratch = S> + ?Sized,
    {
        keys.restore_rows(&self.keys, src, dst, n);
        data.restore_rows(&self.data, src, dst, n);
    }
}

fn initial_capacity(range_len: usize) -> usize {
    let initial = TIMSORT_PARAMS.initial_tmp_storage_length;
    if range_len < 2 * initial {
        range_len >> 1
    } else {
        initial
    }
}

/// Next power of two above `min_capacity`, capped at half the sorted range.
fn grown_capacity(min_capacity: usize, range_len: usize) -> usize {
    let mut new_len = min_capacity;
    new_len |= new_len >> 1;
    new_len |= new_len >> 2;
    new_len |= new_len >> 4;
    new_len |= new_len >> 8;
    new_len |= new_len >> 16;
    #[cfg(target_pointer_width = "64")]
    {
        new_len |= new_len >> 32;
    }

    match new_len.checked_add(1) {
        Some(new_len) => new_len.min(range_len >> 1).max(min_capacity),
        None => min_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::{ScratchBuffers, grown_capacity, initial_capacity};

    #[test]
    fn initial_capacity_is_half_or_fixed() {
        assert_eq!(initial_capacity(32), 16);
        assert_eq!(initial_capacity(100), 50);
        assert_eq!(initial_capacity(511), 255);
        assert_eq!(initial_capacity(512), 256);
        assert_eq!(initial_capacity(1_000_000), 256);
    }

    #[test]
    fn growth_rounds_to_power_of_two_and_caps() {
        assert_eq!(grown_capacity(257, 100_000), 512);
        assert_eq!(grown_capacity(512, 100_000), 1024);
        assert_eq!(grown_capacity(1000, 100_000), 1024);
        assert_eq!(grown_capacity(3000, 7000), 3500);
        assert_eq!(grown_capacity(usize::MAX, usize::MAX), usize::MAX);
    }

    #[test]
    fn ensure_capacity_never_shrinks() {
        let mut ids = vec![0_u32; 10_000];
        let mut buffers = ScratchBuffers::<i64, _>::new(ids.len(), &mut ids);
        assert_eq!(buffers.capacity(), 256);

        buffers.ensure_capacity(&mut ids, 100);
        assert_eq!(buffers.capacity(), 256);

        buffers.ensure_capacity(&mut ids, 300);
        assert_eq!(buffers.capacity(), 512);
        assert!(buffers.keys.capacity() >= 512);
        assert!(buffers.data.capacity() >= 512);

        buffers.ensure_capacity(&mut ids, 10);
        assert_eq!(buffers.capacity(), 512);
    }

    #[test]
    fn stash_then_restore_rows() {
        let mut keys = vec![5, 6, 7, 8];
        let mut names = vec!["e", "f", "g", "h"];
        let mut buffers = ScratchBuffers::<i32, _>::new(keys.len(), &mut names);

        buffers.stash(&mut keys, &mut names, 1, 2);
        buffers.restore(&mut keys, &mut names, 0, 2, 2);
        assert_eq!(keys, [5, 6, 6, 7]);
        assert_eq!(names, ["e", "f", "f", "g"]);
    }
}

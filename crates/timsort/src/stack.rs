use crate::columns::Columns;
use crate::error::SortError;
use crate::merge::{MergeState, merge_runs};

/// A sorted, contiguous range of rows waiting to be merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub(crate) base: usize,
    pub(crate) len: usize,
}

/// Pending runs, bottom to top.
///
/// After every push and collapse, for the top three lengths `a, b, c`
/// (`c` on top): `a > b + c` and `b > c`. Run lengths therefore grow at least
/// as fast as the Fibonacci numbers from the top down, which bounds the depth
/// logarithmically.
pub(crate) struct RunStack {
    runs: Vec<Run>,
}

impl RunStack {
    pub(crate) fn with_capacity_for(range_len: usize) -> Self {
        let depth = if range_len < 120 {
            5
        } else if range_len < 1542 {
            10
        } else if range_len < 119_151 {
            19
        } else {
            40
        };
        Self {
            runs: Vec::with_capacity(depth),
        }
    }

    #[inline]
    pub(crate) fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub(crate) fn push_run(&mut self, base: usize, len: usize) {
        debug_assert!(
            self.runs
                .last()
                .is_none_or(|top| top.base + top.len == base)
        );
        self.runs.push(Run { base, len });
    }

    /// Merges until the stack invariant holds again.
    pub(crate) fn merge_collapse<K, C, F>(
        &mut self,
        keys: &mut [K],
        data: &mut C,
        state: &mut MergeState<K, C::Scratch>,
        is_less: &mut F,
    ) -> Result<(), SortError>
    where
        K: Clone,
        C: Columns + ?Sized,
        F: FnMut(&K, &K) -> bool,
    {
        while self.runs.len() > 1 {
            let runs = &self.runs;
            let mut n = runs.len() - 2;
            if (n >= 1 && runs[n - 1].len <= runs[n].len + runs[n + 1].len)
                || (n >= 2 && runs[n - 2].len <= runs[n].len + runs[n - 1].len)
            {
                if runs[n - 1].len < runs[n + 1].len {
                    n -= 1;
                }
            } else if runs[n].len > runs[n + 1].len {
                break;
            }
            self.merge_at(n, keys, data, state, is_less)?;
        }
        Ok(())
    }

    /// Merges everything left into a single run.
    pub(crate) fn merge_force_collapse<K, C, F>(
        &mut self,
        keys: &mut [K],
        data: &mut C,
        state: &mut MergeState<K, C::Scratch>,
        is_less: &mut F,
    ) -> Result<(), SortError>
    where
        K: Clone,
        C: Columns + ?Sized,
        F: FnMut(&K, &K) -> bool,
    {
        while self.runs.len() > 1 {
            let runs = &self.runs;
            let mut n = runs.len() - 2;
            if n > 0 && runs[n - 1].len < runs[n + 1].len {
                n -= 1;
            }
            self.merge_at(n, keys, data, state, is_less)?;
        }
        Ok(())
    }

    /// Merges the runs at `i` and `i + 1`, which must be the second and
    /// third, or first and second, from the top.
    fn merge_at<K, C, F>(
        &mut self,
        i: usize,
        keys: &mut [K],
        data: &mut C,
        state: &mut MergeState<K, C::Scratch>,
        is_less: &mut F,
    ) -> Result<(), SortError>
    where
        K: Clone,
        C: Columns + ?Sized,
        F: FnMut(&K, &K) -> bool,
    {
        let size = self.runs.len();
        debug_assert!(size >= 2);
        debug_assert!(i == size - 2 || (size >= 3 && i == size - 3));

        let run1 = self.runs[i];
        let run2 = self.runs.remove(i + 1);
        debug_assert!(run1.len > 0 && run2.len > 0);
        debug_assert_eq!(run1.base + run1.len, run2.base);
        self.runs[i].len = run1.len + run2.len;

        merge_runs(keys, data, state, is_less, run1, run2)
    }
}

#[cfg(test)]
mod tests {
    use super::{Run, RunStack};
    use crate::merge::MergeState;

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    fn assert_invariant(runs: &[Run]) {
        let lens: Vec<usize> = runs.iter().map(|run| run.len).collect();
        let n = lens.len();
        if n >= 2 {
            assert!(lens[n - 2] > lens[n - 1], "lens={lens:?}");
        }
        if n >= 3 {
            assert!(lens[n - 3] > lens[n - 2] + lens[n - 1], "lens={lens:?}");
        }
    }

    /// Pushes ascending runs of the given lengths over one key column and
    /// collapses after every push.
    fn push_all(lens: &[usize]) -> (Vec<i32>, RunStack) {
        let total: usize = lens.iter().sum();
        let mut keys = Vec::with_capacity(total);
        for (r, &len) in lens.iter().enumerate() {
            keys.extend((0..len as i32).map(|j| j * 7 + r as i32));
        }

        let mut state = MergeState::<i32, ()>::new(total, &mut ());
        let mut stack = RunStack::with_capacity_for(total);
        let mut base = 0;
        for &len in lens {
            stack.push_run(base, len);
            stack
                .merge_collapse(&mut keys, &mut (), &mut state, &mut less)
                .unwrap();
            assert_invariant(stack.runs());
            base += len;
        }
        (keys, stack)
    }

    #[test]
    fn collapse_keeps_invariant() {
        let (_, stack) = push_all(&[300, 100, 60, 30, 20, 15, 10, 70, 5, 200, 1, 1, 1]);
        assert!(stack.runs().len() > 1);

        let (_, stack) = push_all(&[100, 30, 20]);
        assert_eq!(
            stack.runs(),
            [
                Run { base: 0, len: 100 },
                Run { base: 100, len: 30 },
                Run { base: 130, len: 20 },
            ]
        );
    }

    #[test]
    fn equal_or_growing_top_merges() {
        let (keys, stack) = push_all(&[10, 20]);
        assert_eq!(stack.runs(), [Run { base: 0, len: 30 }]);
        assert!(keys.is_sorted());

        // 100 <= 30 + 80 merges (30, 80), then 100 <= 110 merges the rest.
        let (keys, stack) = push_all(&[100, 30, 80]);
        assert_eq!(stack.runs(), [Run { base: 0, len: 210 }]);
        assert!(keys.is_sorted());
    }

    #[test]
    fn smaller_neighbour_is_merged_first() {
        // 50 <= 30 + 60 and 50 < 60: the lower pair (50, 30) merges, not (30, 60).
        let (keys, stack) = push_all(&[50, 30, 60]);
        assert_eq!(
            stack.runs(),
            [Run { base: 0, len: 80 }, Run { base: 80, len: 60 }]
        );
        assert!(keys[..80].is_sorted());
    }

    #[test]
    fn force_collapse_leaves_one_sorted_run() {
        let lens = [40, 30, 20, 10, 5, 3];
        let (mut keys, mut stack) = push_all(&lens);
        let total: usize = lens.iter().sum();
        let mut state = MergeState::<i32, ()>::new(total, &mut ());
        stack
            .merge_force_collapse(&mut keys, &mut (), &mut state, &mut less)
            .unwrap();

        assert_eq!(stack.runs(), [Run { base: 0, len: total }]);
        assert!(keys.is_sorted());
    }

    #[test]
    fn stack_capacity_table() {
        assert!(RunStack::with_capacity_for(64).runs.capacity() >= 5);
        assert!(RunStack::with_capacity_for(1000).runs.capacity() >= 10);
        assert!(RunStack::with_capacity_for(100_000).runs.capacity() >= 19);
        assert!(RunStack::with_capacity_for(1 << 20).runs.capacity() >= 40);
    }
}

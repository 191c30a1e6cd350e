/// A group of equally long columns that are permuted in lockstep with the keys.
///
/// Every row operation must be applied to each column, so a `(ids, names)`
/// pair stays zipped with the key column through the whole sort. Scratch
/// storage used by merges is owned by the caller of these methods and lives
/// for one sort call.
///
/// Row indices are absolute positions in the columns, never offsets into a
/// sub-range.
///
/// Rows move by `Clone`. For `Copy` elements that is a plain copy, and
/// `restore_rows` goes through `clone_from_slice`, which std lowers to a
/// memcpy. Heap-owning elements such as `String` allocate on every row a merge
/// moves; for those, sort an index column alongside the keys and apply the
/// permutation afterwards. Input that is already in order moves no rows.
pub trait Columns {
    type Scratch: Default;

    /// Returns the length of the first column that is not `expected` long.
    fn mismatched_len(&self, expected: usize) -> Option<usize>;

    fn swap_rows(&mut self, a: usize, b: usize);

    /// Moves row `hi - 1` to `lo`, shifting rows `lo..hi - 1` one slot right.
    fn shift_insert(&mut self, lo: usize, hi: usize);

    /// Copies `n` rows from `src` to `dst`. The ranges may overlap.
    fn copy_rows(&mut self, src: usize, dst: usize, n: usize);

    /// Makes room for at least `capacity` rows in `scratch`.
    fn reserve_scratch(&mut self, scratch: &mut Self::Scratch, capacity: usize);

    /// Replaces the contents of `scratch` with rows `base..base + n`.
    fn stash_rows(&mut self, scratch: &mut Self::Scratch, base: usize, n: usize);

    /// Copies scratch rows `src..src + n` back to rows `dst..dst + n`.
    fn restore_rows(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, n: usize);
}

pub(crate) fn clone_within<T: Clone>(values: &mut [T], src: usize, dst: usize, n: usize) {
    if src == dst {
        return;
    }
    if dst < src {
        for i in 0..n {
            values[dst + i] = values[src + i].clone();
        }
    } else {
        for i in (0..n).rev() {
            values[dst + i] = values[src + i].clone();
        }
    }
}

impl<T: Clone> Columns for [T] {
    type Scratch = Vec<T>;

    fn mismatched_len(&self, expected: usize) -> Option<usize> {
        (self.len() != expected).then_some(self.len())
    }

    #[inline]
    fn swap_rows(&mut self, a: usize, b: usize) {
        <[T]>::swap(self, a, b);
    }

    #[inline]
    fn shift_insert(&mut self, lo: usize, hi: usize) {
        self[lo..hi].rotate_right(1);
    }

    #[inline]
    fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
        clone_within(self, src, dst, n);
    }

    fn reserve_scratch(&mut self, scratch: &mut Vec<T>, capacity: usize) {
        if scratch.capacity() < capacity {
            scratch.reserve_exact(capacity - scratch.len());
        }
    }

    #[inline]
    fn stash_rows(&mut self, scratch: &mut Vec<T>, base: usize, n: usize) {
        scratch.clear();
        scratch.extend_from_slice(&self[base..base + n]);
    }

    #[inline]
    fn restore_rows(&mut self, scratch: &Vec<T>, src: usize, dst: usize, n: usize) {
        self[dst..dst + n].clone_from_slice(&scratch[src..src + n]);
    }
}

impl<T: Clone> Columns for Vec<T> {
    type Scratch = Vec<T>;

    fn mismatched_len(&self, expected: usize) -> Option<usize> {
        self.as_slice().mismatched_len(expected)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap_rows(a, b);
    }

    fn shift_insert(&mut self, lo: usize, hi: usize) {
        self.as_mut_slice().shift_insert(lo, hi);
    }

    fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
        self.as_mut_slice().copy_rows(src, dst, n);
    }

    fn reserve_scratch(&mut self, scratch: &mut Vec<T>, capacity: usize) {
        self.as_mut_slice().reserve_scratch(scratch, capacity);
    }

    fn stash_rows(&mut self, scratch: &mut Vec<T>, base: usize, n: usize) {
        self.as_mut_slice().stash_rows(scratch, base, n);
    }

    fn restore_rows(&mut self, scratch: &Vec<T>, src: usize, dst: usize, n: usize) {
        self.as_mut_slice().restore_rows(scratch, src, dst, n);
    }
}

impl<C: Columns + ?Sized> Columns for &mut C {
    type Scratch = C::Scratch;

    fn mismatched_len(&self, expected: usize) -> Option<usize> {
        (**self).mismatched_len(expected)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        (**self).swap_rows(a, b);
    }

    fn shift_insert(&mut self, lo: usize, hi: usize) {
        (**self).shift_insert(lo, hi);
    }

    fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
        (**self).copy_rows(src, dst, n);
    }

    fn reserve_scratch(&mut self, scratch: &mut C::Scratch, capacity: usize) {
        (**self).reserve_scratch(scratch, capacity);
    }

    fn stash_rows(&mut self, scratch: &mut C::Scratch, base: usize, n: usize) {
        (**self).stash_rows(scratch, base, n);
    }

    fn restore_rows(&mut self, scratch: &C::Scratch, src: usize, dst: usize, n: usize) {
        (**self).restore_rows(scratch, src, dst, n);
    }
}

/// No companion columns: only the keys are sorted.
impl Columns for () {
    type Scratch = ();

    fn mismatched_len(&self, _expected: usize) -> Option<usize> {
        None
    }

    fn swap_rows(&mut self, _a: usize, _b: usize) {}

    fn shift_insert(&mut self, _lo: usize, _hi: usize) {}

    fn copy_rows(&mut self, _src: usize, _dst: usize, _n: usize) {}

    fn reserve_scratch(&mut self, _scratch: &mut (), _capacity: usize) {}

    fn stash_rows(&mut self, _scratch: &mut (), _base: usize, _n: usize) {}

    fn restore_rows(&mut self, _scratch: &(), _src: usize, _dst: usize, _n: usize) {}
}

macro_rules! tuple_columns {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Columns),+> Columns for ($($name,)+) {
            type Scratch = ($($name::Scratch,)+);

            fn mismatched_len(&self, expected: usize) -> Option<usize> {
                None$(.or_else(|| self.$idx.mismatched_len(expected)))+
            }

            #[inline]
            fn swap_rows(&mut self, a: usize, b: usize) {
                $(self.$idx.swap_rows(a, b);)+
            }

            #[inline]
            fn shift_insert(&mut self, lo: usize, hi: usize) {
                $(self.$idx.shift_insert(lo, hi);)+
            }

            #[inline]
            fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
                $(self.$idx.copy_rows(src, dst, n);)+
            }

            fn reserve_scratch(&mut self, scratch: &mut Self::Scratch, capacity: usize) {
                $(self.$idx.reserve_scratch(&mut scratch.$idx, capacity);)+
            }

            #[inline]
            fn stash_rows(&mut self, scratch: &mut Self::Scratch, base: usize, n: usize) {
                $(self.$idx.stash_rows(&mut scratch.$idx, base, n);)+
            }

            #[inline]
            fn restore_rows(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, n: usize) {
                $(self.$idx.restore_rows(&scratch.$idx, src, dst, n);)+
            }
        }
    };
}

tuple_columns!(A 0);
tuple_columns!(A 0, B 1);
tuple_columns!(A 0, B 1, C 2);
tuple_columns!(A 0, B 1, C 2, D 3);
tuple_columns!(A 0, B 1, C 2, D 3, E 4);
tuple_columns!(A 0, B 1, C 2, D 3, E 4, F 5);

trait ErasedColumn {
    fn len(&self) -> usize;
    fn swap_rows(&mut self, a: usize, b: usize);
    fn shift_insert(&mut self, lo: usize, hi: usize);
    fn copy_rows(&mut self, src: usize, dst: usize, n: usize);
    fn reserve_scratch(&mut self, capacity: usize);
    fn stash_rows(&mut self, base: usize, n: usize);
    fn restore_rows(&mut self, src: usize, dst: usize, n: usize);
}

struct SliceColumn<'a, T> {
    values: &'a mut [T],
    scratch: Vec<T>,
}

impl<T: Clone> ErasedColumn for SliceColumn<'_, T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        self.values.swap(a, b);
    }

    fn shift_insert(&mut self, lo: usize, hi: usize) {
        self.values[lo..hi].rotate_right(1);
    }

    fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
        clone_within(self.values, src, dst, n);
    }

    fn reserve_scratch(&mut self, capacity: usize) {
        if self.scratch.capacity() < capacity {
            self.scratch.reserve_exact(capacity - self.scratch.len());
        }
    }

    fn stash_rows(&mut self, base: usize, n: usize) {
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.values[base..base + n]);
    }

    fn restore_rows(&mut self, src: usize, dst: usize, n: usize) {
        self.values[dst..dst + n].clone_from_slice(&self.scratch[src..src + n]);
    }
}

/// Companion columns registered one by one, for when the number of columns
/// is only known at runtime.
///
/// ```
/// use timsort::ColumnSet;
///
/// let mut keys = vec![3, 1, 2];
/// let mut ids = vec![0_u32, 1, 2];
/// let mut names = vec![String::from("c"), String::from("a"), String::from("b")];
///
/// let mut set = ColumnSet::new().with(&mut ids).with(&mut names);
/// timsort::sort_all(&mut keys, &mut set)?;
/// drop(set);
///
/// assert_eq!(keys, [1, 2, 3]);
/// assert_eq!(ids, [1, 2, 0]);
/// assert_eq!(names, ["a", "b", "c"]);
/// # Ok::<(), timsort::SortError>(())
/// ```
///
/// Each column keeps its own scratch buffer, so [`Columns::Scratch`] is `()`.
#[derive(Default)]
pub struct ColumnSet<'a> {
    columns: Vec<Box<dyn ErasedColumn + 'a>>,
}

impl<'a> ColumnSet<'a> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn with<T: Clone + 'a>(mut self, column: &'a mut [T]) -> Self {
        self.push(column);
        self
    }

    pub fn push<T: Clone + 'a>(&mut self, column: &'a mut [T]) {
        self.columns.push(Box::new(SliceColumn {
            values: column,
            scratch: Vec::new(),
        }));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Columns for ColumnSet<'_> {
    type Scratch = ();

    fn mismatched_len(&self, expected: usize) -> Option<usize> {
        self.columns
            .iter()
            .map(|column| column.len())
            .find(|&len| len != expected)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for column in &mut self.columns {
            column.swap_rows(a, b);
        }
    }

    fn shift_insert(&mut self, lo: usize, hi: usize) {
        for column in &mut self.columns {
            column.shift_insert(lo, hi);
        }
    }

    fn copy_rows(&mut self, src: usize, dst: usize, n: usize) {
        for column in &mut self.columns {
            column.copy_rows(src, dst, n);
        }
    }

    fn reserve_scratch(&mut self, _scratch: &mut (), capacity: usize) {
        for column in &mut self.columns {
            column.reserve_scratch(capacity);
        }
    }

    fn stash_rows(&mut self, _scratch: &mut (), base: usize, n: usize) {
        for column in &mut self.columns {
            column.stash_rows(base, n);
        }
    }

    fn restore_rows(&mut self, _scratch: &(), src: usize, dst: usize, n: usize) {
        for column in &mut self.columns {
            column.restore_rows(src, dst, n);
        }
    }
}

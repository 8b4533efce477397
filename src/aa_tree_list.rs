use core::fmt;
use core::fmt::Write as _;
use core::iter::FusedIterator;

use alloc::string::String;

use crate::error::Error;
use crate::raw::{Handle, RankDescent, RawAATree, RawIter};

/// A rank-indexed sequence based on an [AA-tree].
///
/// `AATreeList` is a list addressable and mutable by position *anywhere* in O(log n),
/// not just at the ends: `insert`, `remove`, and `get` all descend by rank (the count of
/// elements before a position) through a size-augmented tree, with an amortized constant
/// number of rotations per mutation.
///
/// Calls with an index outside the valid range fail with [`Error::OutOfRange`] and leave
/// the sequence untouched. Valid indices are `0..=len()` for `insert` (inserting at
/// `len()` appends) and `0..len()` for `get` and `remove`.
///
/// # Examples
///
/// ```
/// use aa_tree::AATreeList;
///
/// let mut list = AATreeList::new();
/// list.push_back('a');
/// list.push_back('c');
/// list.insert(1, 'b').unwrap();
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get(1), Ok(&'b'));
/// assert_eq!(list.iter().copied().collect::<String>(), "abc");
///
/// assert_eq!(list.remove(0), Ok('a'));
/// assert_eq!(list.get(0), Ok(&'b'));
/// ```
///
/// [AA-tree]: https://en.wikipedia.org/wiki/AA_tree
pub struct AATreeList<T> {
    raw: RawAATree<T>,
}

impl<T> AATreeList<T> {
    /// Creates an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeList;
    ///
    /// let list: AATreeList<i32> = AATreeList::new();
    /// assert!(list.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawAATree::new() }
    }

    /// Creates an empty list with capacity for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawAATree::with_capacity(capacity),
        }
    }

    /// Returns the current capacity of the list.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of elements in the list. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the list contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the list, removing all elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Iterative descent: at each node, an index equal to the node's rank stops there, a
    /// smaller one goes left, and a larger one goes right minus `rank + 1`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::{AATreeList, Error};
    ///
    /// let list = AATreeList::from_iter(["x", "y"]);
    /// assert_eq!(list.get(0), Ok(&"x"));
    /// assert_eq!(list.get(5), Err(Error::OutOfRange { index: 5, len: 2 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        self.check_index(index, self.len())?;
        let h = self
            .raw
            .find(&mut RankDescent::new(index))
            .expect("`AATreeList::get()` - a validated rank is missing from the tree!");
        Ok(self.raw.item(h))
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfRange`] if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        self.check_index(index, self.len())?;
        let h = self
            .raw
            .find(&mut RankDescent::new(index))
            .expect("`AATreeList::get_mut()` - a validated rank is missing from the tree!");
        Ok(self.raw.item_mut(h))
    }

    /// Inserts `value` at `index`, shifting every element after it one position right.
    /// Inserting at `len()` appends. O(log n).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfRange`] if `index > len()`; the list is left completely
    /// unmodified.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeList;
    ///
    /// let mut list = AATreeList::new();
    /// list.insert(0, "x").unwrap();
    /// list.insert(1, "y").unwrap();
    /// list.insert(1, "z").unwrap();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["x", "z", "y"]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        // Inserting at `len()` is the append position.
        self.check_index(index, self.len() + 1)?;
        self.raw.insert_with(&mut RankDescent::new(index), value);
        Ok(())
    }

    /// Appends `value` to the back of the list. O(log n).
    pub fn push_back(&mut self, value: T) {
        let end = self.len();
        self.raw.insert_with(&mut RankDescent::new(end), value);
    }

    /// Removes the element at `index`, returning it and shifting every element after it
    /// one position left. O(log n).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfRange`] if `index >= len()`; the list is left completely
    /// unmodified.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeList;
    ///
    /// let mut list = AATreeList::from_iter(["x", "z", "y"]);
    /// assert_eq!(list.remove(1), Ok("z"));
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["x", "y"]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T, Error> {
        self.check_index(index, self.len())?;
        let removed = self
            .raw
            .remove_with(&mut RankDescent::new(index))
            .expect("`AATreeList::remove()` - a validated rank is missing from the tree!");
        Ok(removed)
    }

    /// Gets an iterator over the elements of the list, in index order.
    ///
    /// The iterator is lazy (one element per pull) and finite. Each call starts a fresh
    /// traversal; the list cannot be mutated while an iterator is live, which the borrow
    /// checker enforces.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeList;
    ///
    /// let list = AATreeList::from_iter([10, 20, 30]);
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&10));
    /// assert_eq!(iter.next(), Some(&20));
    /// assert_eq!(iter.next(), Some(&30));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.raw.iter() }
    }

    /// Validation happens strictly before any structural edit: every fallible call
    /// checks its index here first, so a failing call never touches the tree.
    fn check_index(&self, index: usize, bound: usize) -> Result<(), Error> {
        if index < bound {
            Ok(())
        } else {
            Err(Error::OutOfRange { index, len: self.len() })
        }
    }
}

impl<T: fmt::Debug> AATreeList<T> {
    /// Renders an indented structural dump for debugging: one `(value, level)` line per
    /// node, right subtree above its parent, one tab per tree depth.
    ///
    /// The output is a debugging aid, not part of the behavioral contract.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.raw.root(), 0, &mut out);
        out
    }

    fn dump_node(&self, h: Handle, depth: usize, out: &mut String) {
        if h.is_sentinel() {
            return;
        }
        self.dump_node(self.raw.right(h), depth + 1, out);
        for _ in 0..depth {
            out.push('\t');
        }
        let _ = writeln!(out, "({:?}, {})", self.raw.item(h), self.raw.level(h));
        self.dump_node(self.raw.left(h), depth + 1, out);
    }
}

impl<T> Default for AATreeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AATreeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for AATreeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for AATreeList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// An iterator over the elements of an [`AATreeList`], in index order.
///
/// This `struct` is created by the [`iter`](AATreeList::iter) method on [`AATreeList`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: RawIter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the elements of an [`AATreeList`], in index order.
///
/// This `struct` is created by the [`into_iter`](IntoIterator::into_iter) method on
/// [`AATreeList`].
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for AATreeList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AATreeList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

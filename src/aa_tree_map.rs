use core::borrow::Borrow;
use core::fmt;
use core::fmt::Write as _;
use core::iter::FusedIterator;

use alloc::string::String;

use crate::error::Error;
use crate::raw::{Handle, KeyDescent, KeyPlace, RawAATree, RawIter};

/// An ordered map based on an [AA-tree].
///
/// Given a key type with a [total order], the map stores its entries in key order. Keys
/// must implement [`Ord`]; the structure makes no other assumption about the key type.
/// All of `set`, `get`, and `remove` run in O(log n) with an amortized constant number
/// of rotations, and `len` is O(1) via a maintained subtree size.
///
/// Lookup and removal of an absent key fail with [`Error::NotFound`] and leave the map
/// untouched.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering
/// relative to any other key, as determined by the [`Ord`] trait, changes while it is in
/// the map. This is normally only possible through [`Cell`], [`RefCell`], global state,
/// I/O, or unsafe code. The behavior resulting from such a logic error is not specified
/// (it could include panics or incorrect results) but will not be undefined behavior.
///
/// # Examples
///
/// ```
/// use aa_tree::{AATreeMap, Error};
///
/// let mut movie_reviews = AATreeMap::new();
///
/// // review some movies.
/// movie_reviews.set("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.set("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.set("The Godfather",      "Very enjoyable.");
/// movie_reviews.set("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers").unwrap();
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///         Ok(review) => println!("{movie}: {review}"),
///         Err(Error::NotFound) => println!("{movie} is unreviewed."),
///         Err(_) => unreachable!(),
///     }
/// }
///
/// // iterate over everything, in key order.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// An `AATreeMap` with a known list of entries can be initialized from an array:
///
/// ```
/// use aa_tree::AATreeMap;
///
/// let solar_distance = AATreeMap::from_iter([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.len(), 4);
/// ```
///
/// [AA-tree]: https://en.wikipedia.org/wiki/AA_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct AATreeMap<K, V> {
    raw: RawAATree<(K, V)>,
}

impl<K, V> AATreeMap<K, V> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let map: AATreeMap<i32, i32> = AATreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawAATree::new() }
    }

    /// Creates an empty map with capacity for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawAATree::with_capacity(capacity),
        }
    }

    /// Returns the current capacity of the map.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of entries in the map. O(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let mut map = AATreeMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.set(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// The map must not be mutated while the iterator is live; the borrow checker
    /// enforces this.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let map = AATreeMap::from_iter([(3, "c"), (1, "a"), (2, "b")]);
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets an iterator over the keys of the map, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let map = AATreeMap::from_iter([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.raw.iter() }
    }
}

impl<K: Ord, V> AATreeMap<K, V> {
    /// Sets the value for `key`, creating the entry if absent.
    ///
    /// Last write wins: setting an existing key overwrites its value in place, with no
    /// structural change, and returns the previous value. A duplicate key is never
    /// created.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let mut map = AATreeMap::new();
    /// assert_eq!(map.set(37, "a"), None);
    /// assert_eq!(map.set(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Ok(&"b"));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert_with(&mut KeyPlace, (key, value)).map(|(_, value)| value)
    }

    /// Returns a reference to the value corresponding to `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::{AATreeMap, Error};
    ///
    /// let mut map = AATreeMap::new();
    /// map.set(1, "a");
    /// assert_eq!(map.get(&1), Ok(&"a"));
    /// assert_eq!(map.get(&2), Err(Error::NotFound));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.raw.find(&mut KeyDescent::new(key)).ok_or(Error::NotFound)?;
        Ok(&self.raw.item(h).1)
    }

    /// Returns a mutable reference to the value corresponding to `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::AATreeMap;
    ///
    /// let mut map = AATreeMap::new();
    /// map.set(1, "a");
    /// if let Ok(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(map.get(&1), Ok(&"b"));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.raw.find(&mut KeyDescent::new(key)).ok_or(Error::NotFound)?;
        Ok(&mut self.raw.item_mut(h).1)
    }

    /// Returns `true` if the map contains a value for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(&mut KeyDescent::new(key)).is_some()
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if the key is not present; the map is left
    /// completely unmodified.
    ///
    /// # Examples
    ///
    /// ```
    /// use aa_tree::{AATreeMap, Error};
    ///
    /// let mut map = AATreeMap::new();
    /// map.set(1, "a");
    /// assert_eq!(map.remove(&1), Ok("a"));
    /// assert_eq!(map.remove(&1), Err(Error::NotFound));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (_, value) = self.raw.remove_with(&mut KeyDescent::new(key)).ok_or(Error::NotFound)?;
        Ok(value)
    }
}

impl<K: fmt::Debug, V> AATreeMap<K, V> {
    /// Renders an indented structural dump for debugging: one `(key, level)` line per
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
        let (key, _) = self.raw.item(h);
        let _ = writeln!(out, "({key:?}, {})", self.raw.level(h));
        self.dump_node(self.raw.left(h), depth + 1, out);
    }
}

impl<K, V> Default for AATreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AATreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AATreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AATreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// An iterator over the entries of an [`AATreeMap`], sorted by key.
///
/// This `struct` is created by the [`iter`](AATreeMap::iter) method on [`AATreeMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of an [`AATreeMap`], in ascending order.
///
/// This `struct` is created by the [`keys`](AATreeMap::keys) method on [`AATreeMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: RawIter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An owning iterator over the entries of an [`AATreeMap`], sorted by key.
///
/// This `struct` is created by the [`into_iter`](IntoIterator::into_iter) method on
/// [`AATreeMap`].
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for AATreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AATreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use crate::error::Error;

    use super::*;

    #[test]
    fn set_get_keys_in_order() {
        let mut map = AATreeMap::new();
        map.set("b", 1);
        map.set("a", 2);
        map.set("c", 3);
        map.raw.check_invariants();

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(map.get(&"a"), Ok(&2));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn remove_then_lookup_fails() {
        let mut map = AATreeMap::new();
        map.set("b", 1);
        map.set("a", 2);
        map.set("c", 3);

        assert_eq!(map.remove(&"a"), Ok(2));
        map.raw.check_invariants();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(map.get(&"a"), Err(Error::NotFound));
    }

    #[test]
    fn failed_calls_leave_the_map_unchanged() {
        let mut map = AATreeMap::from_iter([(1, "a"), (2, "b"), (3, "c")]);
        let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();

        assert_eq!(map.get(&9), Err(Error::NotFound));
        assert_eq!(map.remove(&9), Err(Error::NotFound));
        map.raw.check_invariants();

        assert_eq!(map.len(), 3);
        assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), before);
    }

    #[test]
    fn last_write_wins() {
        let mut map = AATreeMap::new();
        for round in 0..4 {
            for key in 0..50 {
                map.set(key, (key, round));
                map.raw.check_invariants();
            }
            assert_eq!(map.len(), 50);
        }
        for key in 0..50 {
            assert_eq!(map.get(&key), Ok(&(key, 3)));
        }
    }

    #[test]
    fn borrowed_key_lookup() {
        use alloc::string::ToString;

        let mut map = AATreeMap::new();
        map.set("one".to_string(), 1);
        // `Borrow<str>` lets `&str` query a `String`-keyed map.
        assert_eq!(map.get("one"), Ok(&1));
        assert!(map.contains_key("one"));
        assert_eq!(map.remove("one"), Ok(1));
    }

    #[test]
    fn into_iter_drains_in_key_order() {
        let map = AATreeMap::from_iter([(3, "c"), (1, "a"), (2, "b")]);
        let entries: Vec<_> = map.into_iter().collect();
        assert_eq!(entries, [(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn dump_lists_every_key_with_its_level() {
        let map = AATreeMap::from_iter([(2, 'b'), (1, 'a'), (3, 'c')]);
        let dump = map.dump();

        assert_eq!(dump.lines().count(), 3);
        for key in 1..=3 {
            assert!(dump.contains(&alloc::format!("({key:?}, ")));
        }
    }

    #[test]
    fn debug_formats_as_a_map() {
        let map = AATreeMap::from_iter([(2, 'b'), (1, 'a')]);
        assert_eq!(alloc::format!("{map:?}"), "{1: 'a', 2: 'b'}");
    }
}

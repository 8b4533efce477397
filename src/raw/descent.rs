use core::borrow::Borrow;
use core::cmp::Ordering;

use super::handle::Handle;
use super::raw_aa_tree::RawAATree;

/// Where a descent goes from the current node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    /// The current node is the target.
    Found,
    /// The target lies in the left subtree.
    Left,
    /// The target lies in the right subtree.
    Right,
}

/// How `get`/`remove` pick a child and detect their target.
///
/// The map and the list share one lookup/removal engine; the only difference between
/// them is the descent rule. The map compares keys; the list compares the remaining
/// index against the node's rank (its left subtree's size). A probe is stateful so the
/// rank variant can adjust its index while descending right.
pub(crate) trait Locate<T> {
    /// One descent decision. `node` is never the sentinel.
    fn step(&mut self, tree: &RawAATree<T>, node: Handle) -> Step;

    /// Re-aims the probe after a deletion payload swap.
    ///
    /// When removal finds a node with a right subtree, the engine swaps payloads with
    /// the in-order successor and continues removing into the right subtree. The key
    /// probe needs no adjustment (the swapped key still identifies the relocated node);
    /// the rank probe must re-aim at the successor, the leftmost node of that subtree.
    fn on_successor_swap(&mut self) {}
}

/// How `insert` picks a child and detects an existing slot to overwrite.
///
/// Split from [`Locate`] because the insertion probe reads its key out of the payload in
/// flight (`item`) instead of holding a borrow of its own, and because the two ADTs
/// break ties differently: the map overwrites on an equal key, while the list sends an
/// equal rank left (inserting *at* an occupied rank displaces that element rightward).
pub(crate) trait Place<T> {
    /// One descent decision for the payload being inserted. `node` is never the
    /// sentinel. `Found` directs the engine to overwrite `node`'s payload in place.
    fn step(&mut self, tree: &RawAATree<T>, node: Handle, item: &T) -> Step;
}

/// Key-comparison lookup/removal descent for the ordered map.
pub(crate) struct KeyDescent<'a, Q: ?Sized> {
    key: &'a Q,
}

impl<'a, Q: ?Sized> KeyDescent<'a, Q> {
    pub(crate) const fn new(key: &'a Q) -> Self {
        Self { key }
    }
}

impl<K, V, Q> Locate<(K, V)> for KeyDescent<'_, Q>
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    fn step(&mut self, tree: &RawAATree<(K, V)>, node: Handle) -> Step {
        let (key, _) = tree.item(node);
        match self.key.cmp(key.borrow()) {
            Ordering::Equal => Step::Found,
            Ordering::Less => Step::Left,
            Ordering::Greater => Step::Right,
        }
    }
}

/// Key-comparison insertion descent for the ordered map. Last write wins on an equal
/// key; no duplicate key is ever created.
pub(crate) struct KeyPlace;

impl<K: Ord, V> Place<(K, V)> for KeyPlace {
    fn step(&mut self, tree: &RawAATree<(K, V)>, node: Handle, item: &(K, V)) -> Step {
        let (key, _) = tree.item(node);
        match item.0.cmp(key) {
            Ordering::Equal => Step::Found,
            Ordering::Less => Step::Left,
            Ordering::Greater => Step::Right,
        }
    }
}

/// Rank-comparison descent for the indexed list.
///
/// `rank == size(left)` counts the elements strictly before the current node within its
/// subtree. Descending right re-bases the index by `rank + 1`. The caller validates the
/// index against the tree size up front; the probe itself never goes out of range.
pub(crate) struct RankDescent {
    index: usize,
}

impl RankDescent {
    pub(crate) const fn new(index: usize) -> Self {
        Self { index }
    }
}

impl<T> Locate<T> for RankDescent {
    fn step(&mut self, tree: &RawAATree<T>, node: Handle) -> Step {
        let rank = tree.size(tree.left(node));
        match self.index.cmp(&rank) {
            Ordering::Equal => Step::Found,
            Ordering::Less => Step::Left,
            Ordering::Greater => {
                self.index -= rank + 1;
                Step::Right
            }
        }
    }

    fn on_successor_swap(&mut self) {
        // The successor is the leftmost node of the subtree the engine is about to
        // descend into.
        self.index = 0;
    }
}

impl<T> Place<T> for RankDescent {
    fn step(&mut self, tree: &RawAATree<T>, node: Handle, _item: &T) -> Step {
        let rank = tree.size(tree.left(node));
        if self.index <= rank {
            Step::Left
        } else {
            self.index -= rank + 1;
            Step::Right
        }
    }
}

use core::iter::FusedIterator;
use core::mem;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::descent::{Locate, Place, Step};
use super::handle::Handle;
use super::node::AaNode;
use super::size::Size;

/// The inline capacity of a traversal stack. An AA-tree of height 16 holds thousands of
/// elements, so traversals rarely spill to the heap.
const SPINE: usize = 16;

/// The AA-tree rebalancing engine backing both `AATreeMap` and `AATreeList`.
///
/// Nodes live in an arena and link to each other by [`Handle`]; the empty subtree is the
/// shared [`Handle::SENTINEL`], which reads as level 0 and size 0 everywhere. Recursive
/// mutations take a subtree root handle in and hand a (possibly different) subtree root
/// handle back out, so no parent pointers exist anywhere.
///
/// Which element an operation targets is decided by a caller-supplied probe ([`Locate`]
/// or [`Place`]); everything else, including the deletion case analysis, is shared
/// between the two ADTs.
pub(crate) struct RawAATree<T> {
    nodes: Arena<AaNode<T>>,
    root: Handle,
}

impl<T> RawAATree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: Handle::SENTINEL,
        }
    }

    /// Creates a new tree with room for at least `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: Handle::SENTINEL,
        }
    }

    /// Returns the number of elements in the tree. O(1) via the root's cached size.
    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_sentinel()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = Handle::SENTINEL;
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    /// The level of the subtree rooted at `h`; 0 for the sentinel.
    pub(crate) fn level(&self, h: Handle) -> u32 {
        if h.is_sentinel() { 0 } else { self.node(h).level }
    }

    /// The cardinality of the subtree rooted at `h`; 0 for the sentinel.
    pub(crate) fn size(&self, h: Handle) -> usize {
        if h.is_sentinel() { 0 } else { self.node(h).size.to_usize() }
    }

    /// The left child of a non-sentinel node.
    pub(crate) fn left(&self, h: Handle) -> Handle {
        self.node(h).left
    }

    /// The right child of a non-sentinel node.
    pub(crate) fn right(&self, h: Handle) -> Handle {
        self.node(h).right
    }

    /// The payload of a non-sentinel node.
    pub(crate) fn item(&self, h: Handle) -> &T {
        &self.node(h).item
    }

    pub(crate) fn item_mut(&mut self, h: Handle) -> &mut T {
        &mut self.node_mut(h).item
    }

    fn node(&self, h: Handle) -> &AaNode<T> {
        self.nodes.get(h)
    }

    fn node_mut(&mut self, h: Handle) -> &mut AaNode<T> {
        self.nodes.get_mut(h)
    }

    /// Reattaches `child` as the left subtree of `h` and refreshes `h`'s cached size.
    fn set_left(&mut self, h: Handle, child: Handle) {
        self.node_mut(h).left = child;
        self.refresh_size(h);
    }

    /// Reattaches `child` as the right subtree of `h` and refreshes `h`'s cached size.
    fn set_right(&mut self, h: Handle, child: Handle) {
        self.node_mut(h).right = child;
        self.refresh_size(h);
    }

    fn refresh_size(&mut self, h: Handle) {
        let (left, right) = {
            let node = self.node(h);
            (node.left, node.right)
        };
        let size = 1 + self.size(left) + self.size(right);
        self.node_mut(h).size = Size::from_usize(size);
    }

    /// Removes a left-leaning horizontal edge, if present, by rotating right: the left
    /// child is promoted to subtree root and `h` adopts its old right subtree. No-op
    /// otherwise. O(1).
    fn skew(&mut self, h: Handle) -> Handle {
        if h.is_sentinel() {
            return h;
        }
        let left = self.node(h).left;
        if self.level(left) != self.node(h).level {
            return h;
        }

        let left_right = self.node(left).right;
        self.set_left(h, left_right);
        self.set_right(left, h);
        left
    }

    /// Removes two consecutive right horizontal edges, if present, by rotating left:
    /// the right child is promoted to subtree root, one level up, and `h` adopts its old
    /// left subtree. No-op otherwise. O(1).
    fn split(&mut self, h: Handle) -> Handle {
        if h.is_sentinel() {
            return h;
        }
        let level = self.node(h).level;
        let right = self.node(h).right;
        if self.level(right) != level {
            return h;
        }
        let right_right = self.node(right).right;
        if self.level(right_right) != level {
            return h;
        }

        let right_left = self.node(right).left;
        self.set_right(h, right_left);
        self.set_left(right, h);
        self.node_mut(right).level += 1;
        right
    }

    /// The leftmost node of the non-empty subtree rooted at `h`.
    fn leftmost(&self, mut h: Handle) -> Handle {
        while !self.node(h).left.is_sentinel() {
            h = self.node(h).left;
        }
        h
    }

    /// Swaps the payloads of two distinct nodes in place. Purely a payload move; links,
    /// levels, and sizes stay put.
    fn swap_items(&mut self, a: Handle, b: Handle) {
        let (a, b) = self.nodes.get2_mut(a, b);
        mem::swap(&mut a.item, &mut b.item);
    }

    /// Iterative descent to the probe's target. Read-only; the tree is untouched.
    pub(crate) fn find<L: Locate<T>>(&self, probe: &mut L) -> Option<Handle> {
        let mut h = self.root;
        while !h.is_sentinel() {
            match probe.step(self, h) {
                Step::Found => return Some(h),
                Step::Left => h = self.node(h).left,
                Step::Right => h = self.node(h).right,
            }
        }
        None
    }

    /// Inserts `item` where `probe` directs, rebalancing bottom-up with `skew` then
    /// `split` on every node along the descent path. Returns the displaced payload when
    /// the probe found an existing slot to overwrite.
    pub(crate) fn insert_with<P: Place<T>>(&mut self, probe: &mut P, item: T) -> Option<T> {
        let root = self.root;
        let (root, previous) = self.insert_rec(root, probe, item);
        self.root = root;
        previous
    }

    fn insert_rec<P: Place<T>>(&mut self, h: Handle, probe: &mut P, item: T) -> (Handle, Option<T>) {
        if h.is_sentinel() {
            return (self.nodes.alloc(AaNode::new_leaf(item)), None);
        }

        match probe.step(&*self, h, &item) {
            Step::Found => {
                // Overwrite in place; no structural change, no rebalancing needed.
                let previous = mem::replace(&mut self.node_mut(h).item, item);
                (h, Some(previous))
            }
            Step::Left => {
                let left = self.node(h).left;
                let (left, previous) = self.insert_rec(left, probe, item);
                self.set_left(h, left);
                let h = self.skew(h);
                let h = self.split(h);
                (h, previous)
            }
            Step::Right => {
                let right = self.node(h).right;
                let (right, previous) = self.insert_rec(right, probe, item);
                self.set_right(h, right);
                let h = self.skew(h);
                let h = self.split(h);
                (h, previous)
            }
        }
    }

    /// Removes the probe's target, returning its payload, or `None` with the tree
    /// untouched when the target does not exist.
    pub(crate) fn remove_with<L: Locate<T>>(&mut self, probe: &mut L) -> Option<T> {
        let (root, removed) = self.remove_rec(self.root, probe)?;
        self.root = root;
        Some(removed)
    }

    fn remove_rec<L: Locate<T>>(&mut self, h: Handle, probe: &mut L) -> Option<(Handle, T)> {
        if h.is_sentinel() {
            // Absent target. Nothing on the descent path has been touched yet, so the
            // failed call leaves the tree exactly as it was.
            return None;
        }

        match probe.step(&*self, h) {
            Step::Found => {
                let right = self.node(h).right;
                if right.is_sentinel() {
                    // Splice: the node's position is taken by its left child (a single
                    // level-1 node, or the sentinel).
                    let node = self.nodes.take(h);
                    return Some((node.left, node.item));
                }

                // Swap payloads with the in-order successor and keep removing down the
                // right subtree; the physical removal then happens at a node with at
                // most one child.
                let successor = self.leftmost(right);
                self.swap_items(h, successor);
                probe.on_successor_swap();

                let (right, item) = self
                    .remove_rec(right, probe)
                    .expect("`RawAATree::remove_rec()` - the in-order successor vanished mid-removal!");
                self.set_right(h, right);
                Some((self.repair_right(h), item))
            }
            Step::Left => {
                let left = self.node(h).left;
                let (left, item) = self.remove_rec(left, probe)?;
                self.set_left(h, left);
                Some((self.repair_left(h), item))
            }
            Step::Right => {
                let right = self.node(h).right;
                let (right, item) = self.remove_rec(right, probe)?;
                self.set_right(h, right);
                Some((self.repair_right(h), item))
            }
        }
    }

    /// Restores the leveling invariant at `h` after a removal in its left subtree.
    ///
    /// A removal lowers a subtree's level by at most one. If the left child now sits two
    /// levels below `h`, `h` is demoted, and the exact repair depends on whether `h`'s
    /// right edge was horizontal: if not, a single `split` suffices; if so, the demotion
    /// drags the right child down too, and the chain of horizontal edges this exposes is
    /// repaired by skewing the right child and its right child, then splitting `h` and
    /// its new right child. Skipping the second `split` pair would re-violate the
    /// no-double-horizontal invariant one level up.
    fn repair_left(&mut self, h: Handle) -> Handle {
        let level = self.node(h).level;
        let left = self.node(h).left;
        if self.level(left) + 1 >= level {
            return h;
        }
        assert!(
            self.level(left) + 2 == level,
            "`RawAATree::repair_left()` - impossible level delta after removal!"
        );

        let right = self.node(h).right;
        self.node_mut(h).level = level - 1;
        if self.level(right) < level {
            self.split(h)
        } else {
            self.node_mut(right).level = level - 1;
            let right = self.skew(right);
            self.set_right(h, right);
            let right_right = self.skew(self.node(right).right);
            self.set_right(right, right_right);
            let h = self.split(h);
            let new_right = self.split(self.node(h).right);
            self.set_right(h, new_right);
            h
        }
    }

    /// Restores the leveling invariant at `h` after a removal in its right subtree.
    fn repair_right(&mut self, h: Handle) -> Handle {
        let level = self.node(h).level;
        let right = self.node(h).right;
        if self.level(right) + 1 >= level {
            return h;
        }
        assert!(
            self.level(right) + 2 == level,
            "`RawAATree::repair_right()` - impossible level delta after removal!"
        );

        self.node_mut(h).level = level - 1;
        let h = self.skew(h);
        let right = self.skew(self.node(h).right);
        self.set_right(h, right);
        self.split(h)
    }

    /// A fresh in-order iterator over the tree.
    pub(crate) fn iter(&self) -> RawIter<'_, T> {
        let mut iter = RawIter {
            tree: self,
            stack: SmallVec::new(),
            remaining: self.len(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Tears the tree down into an in-order `Vec` of payloads, releasing every node.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: SmallVec<[Handle; SPINE]> = SmallVec::new();

        let mut h = self.root;
        while !h.is_sentinel() {
            stack.push(h);
            h = self.node(h).left;
        }
        while let Some(h) = stack.pop() {
            let node = self.nodes.take(h);
            out.push(node.item);
            let mut h = node.right;
            while !h.is_sentinel() {
                stack.push(h);
                h = self.node(h).left;
            }
        }

        self.clear();
        out
    }
}

/// A lazy in-order traversal using an explicit stack of handles instead of recursion.
///
/// The stack holds the path of nodes whose own payload has not been yielded yet; popping
/// one yields it and pushes the left spine of its right subtree.
pub(crate) struct RawIter<'a, T> {
    tree: &'a RawAATree<T>,
    stack: SmallVec<[Handle; SPINE]>,
    remaining: usize,
}

impl<T> RawIter<'_, T> {
    fn push_left_spine(&mut self, mut h: Handle) {
        while !h.is_sentinel() {
            self.stack.push(h);
            h = self.tree.node(h).left;
        }
    }
}

impl<'a, T> Iterator for RawIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let h = self.stack.pop()?;
        self.push_left_spine(self.tree.node(h).right);
        self.remaining -= 1;
        Some(&self.tree.node(h).item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RawIter<'_, T> {}
impl<T> FusedIterator for RawIter<'_, T> {}

#[cfg(test)]
impl<T> RawAATree<T> {
    /// Walks the whole tree asserting the AA leveling invariants and the cached sizes.
    pub(crate) fn check_invariants(&self) {
        let counted = self.check_node(self.root);
        assert_eq!(counted, self.len(), "root size disagrees with the node count");
    }

    fn check_node(&self, h: Handle) -> usize {
        if h.is_sentinel() {
            return 0;
        }

        let node = self.node(h);
        assert!(node.level >= 1, "stored nodes sit at level >= 1");
        assert_eq!(self.level(node.left), node.level - 1, "left edges must descend exactly one level");
        let right_level = self.level(node.right);
        assert!(
            right_level == node.level || right_level + 1 == node.level,
            "right edges may be horizontal or descend one level"
        );
        if !node.right.is_sentinel() {
            assert!(
                self.level(self.node(node.right).right) < node.level,
                "two consecutive horizontal right edges"
            );
        }

        let size = 1 + self.check_node(node.left) + self.check_node(node.right);
        assert_eq!(node.size.to_usize(), size, "cached subtree size is stale");
        size
    }
}

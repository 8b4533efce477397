use super::handle::Handle;
use super::size::Size;

/// A single AA-tree node.
///
/// The balancing invariants, restored after every completed mutation:
///
/// 1. the sentinel's level is 0, and every stored node's level is >= 1;
/// 2. `level(left) == level - 1` (left edges always descend);
/// 3. `level(right)` is `level` or `level - 1` (at most one horizontal right edge);
/// 4. `level(right.right) < level` (never two consecutive horizontal edges);
/// 5. `size == 1 + size(left) + size(right)`.
pub(crate) struct AaNode<T> {
    /// The payload: `(K, V)` for the map, the element itself for the list.
    pub(crate) item: T,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
    /// The AA level. Stand-in for red-black coloring; never 0 for a stored node.
    pub(crate) level: u32,
    /// Cached subtree cardinality, refreshed on every child reattachment.
    pub(crate) size: Size,
}

impl<T> AaNode<T> {
    /// Creates the only kind of node an insertion ever makes: a level-1 leaf whose
    /// children are both the sentinel.
    pub(crate) const fn new_leaf(item: T) -> Self {
        Self {
            item,
            left: Handle::SENTINEL,
            right: Handle::SENTINEL,
            level: 1,
            size: Size::ONE,
        }
    }
}

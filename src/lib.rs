//! AA-tree collections for Rust.
//!
//! This crate provides [`AATreeMap`] and [`AATreeList`], two containers backed by the
//! same AA-tree balancing discipline:
//!
//! - [`AATreeMap`] - an ordered key-value map with O(log n) insert/lookup/remove and
//!   in-order key iteration.
//! - [`AATreeList`] - a rank-indexed sequence: a list that can be read, inserted into,
//!   and removed from at *any* position in O(log n), not just at the ends.
//!
//! # Example
//!
//! ```
//! use aa_tree::{AATreeList, AATreeMap};
//!
//! let mut scores = AATreeMap::new();
//! scores.set("Alice", 100);
//! scores.set("Bob", 85);
//! scores.set("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Ok(&85));
//! assert_eq!(scores.len(), 3);
//! assert_eq!(scores.keys().copied().collect::<Vec<_>>(), ["Alice", "Bob", "Carol"]);
//!
//! let mut line = AATreeList::new();
//! line.push_back("first");
//! line.push_back("third");
//! line.insert(1, "second").unwrap();
//!
//! assert_eq!(line.get(1), Ok(&"second"));
//! assert_eq!(line.len(), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency.
//! - **O(log n) positional mutation** - `AATreeList` supports insert/remove at arbitrary
//!   ranks via subtree size augmentation.
//! - **Amortized O(1) rotations** - The AA leveling scheme repairs the tree with only
//!   two local rotations, `skew` and `split`.
//!
//! # Implementation
//!
//! An AA-tree is a balanced binary search tree that replaces red-black coloring with a
//! per-node integer *level*. Left edges always descend one level; at most one right edge
//! per node may stay *horizontal* (equal level). Any local violation after a mutation is
//! repaired by `skew` (a right rotation removing a left horizontal edge) followed by
//! `split` (a left rotation, with a level increment, removing two consecutive right
//! horizontal edges), applied bottom-up along the mutated path.
//!
//! Both containers share one rebalancing engine, parameterized over how the descent picks
//! a child: the map descends by key comparison, the list by rank (left-subtree size).
//! Nodes live in a contiguous arena and reference each other by index handles; the empty
//! subtree is a shared level-0 sentinel handle rather than an optional pointer.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod aa_tree_list;
pub mod aa_tree_map;

pub use aa_tree_list::AATreeList;
pub use aa_tree_map::AATreeMap;
pub use error::Error;

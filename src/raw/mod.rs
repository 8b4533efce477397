mod arena;
mod descent;
mod handle;
mod node;
mod raw_aa_tree;
mod size;

pub(crate) use descent::{KeyDescent, KeyPlace, RankDescent};
pub(crate) use handle::Handle;
pub(crate) use raw_aa_tree::{RawAATree, RawIter};

use alloc::vec::Vec;

use super::handle::Handle;

/// A slot arena with a free list.
///
/// Nodes removed from the tree return their slot here for reuse, so a long-lived tree
/// under churn does not grow its backing storage without bound.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            // Strict less-than so the total element count never exceeds `Size::MAX`.
            // `Size::MAX == Handle::MAX`, so we need `slots.len() < Handle::MAX` before
            // the push, which means at most `Handle::MAX` elements after it.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns mutable references to two distinct elements at once.
    pub(crate) fn get2_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (a, b) = (a.to_index(), b.to_index());
        assert!(a != b, "`Arena::get2_mut()` - the handles must be distinct!");
        if a < b {
            let (low, high) = self.slots.split_at_mut(b);
            (
                low[a].as_mut().expect("`Arena::get2_mut()` - `a` is invalid!"),
                high[0].as_mut().expect("`Arena::get2_mut()` - `b` is invalid!"),
            )
        } else {
            let (low, high) = self.slots.split_at_mut(a);
            let first = high[0].as_mut().expect("`Arena::get2_mut()` - `a` is invalid!");
            let second = low[b].as_mut().expect("`Arena::get2_mut()` - `b` is invalid!");
            (first, second)
        }
    }

    /// Removes the element at `handle`, returning it and releasing the slot for reuse.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use proptest::prelude::*;

    use super::super::size::Size;
    use super::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn alloc_up_to_capacity() {
        // `RawHandle` is shrunk to `u16` under test, so the full range is reachable.
        let mut arena: Arena<usize> = Arena::with_capacity(Handle::MAX);
        for i in 0..Handle::MAX {
            arena.alloc(i);
        }
        assert_eq!(arena.len(), Handle::MAX);
        assert_eq!(arena.len(), Size::MAX);
    }

    #[test]
    #[should_panic(expected = "`Arena::alloc()` - arena is at maximum capacity")]
    fn alloc_past_capacity_panics() {
        let mut arena: Arena<usize> = Arena::with_capacity(Handle::MAX);
        for i in 0..=Handle::MAX {
            arena.alloc(i);
        }
    }

    #[test]
    fn slots_are_reused() {
        let mut arena: Arena<u32> = Arena::new();
        let first = arena.alloc(1);
        let second = arena.alloc(2);
        assert_eq!(arena.take(first), 1);
        // The freed slot is handed back before any new slot is grown.
        assert_eq!(arena.alloc(3), first);
        assert_eq!(*arena.get(second), 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn get2_mut_returns_distinct_elements() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);

        let (x, y) = arena.get2_mut(a, b);
        core::mem::swap(x, y);
        assert_eq!(*arena.get(a), 2);
        assert_eq!(*arena.get(b), 1);

        // Order of the handles must not matter.
        let (x, y) = arena.get2_mut(b, a);
        core::mem::swap(x, y);
        assert_eq!(*arena.get(a), 1);
    }

    #[test]
    #[should_panic(expected = "`Arena::get2_mut()` - the handles must be distinct!")]
    fn get2_mut_rejects_aliasing() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let _ = arena.get2_mut(a, a);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Get(usize),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => any::<usize>().prop_map(Operation::Get),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::Get(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let (handle, value) = model[which % model.len()];
                        prop_assert_eq!(*arena.get(handle), value);
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let taken = arena.take(model[index].0);
                        let (_, expected) = model.swap_remove(index);
                        prop_assert_eq!(taken, expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }
}

use super::handle::Handle;

#[cfg(test)]
type RawSize = u16;
#[cfg(not(test))]
type RawSize = u32;

/// A cached subtree cardinality.
///
/// Bounded by [`Handle::MAX`]: the arena can never hold more nodes than it has handles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(RawSize);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(size as RawSize)
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

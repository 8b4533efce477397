#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// An arena index, offset by one so that the raw value `0` names the shared sentinel.
///
/// Every child link in the tree carries a `Handle`: a real node's slot index plus one, or
/// [`Handle::SENTINEL`] for the empty subtree. The sentinel is a well-defined value read
/// uniformly during descent (level 0, size 0), never an `Option`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(RawHandle);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;
    /// The shared empty/leaf terminator.
    pub(crate) const SENTINEL: Self = Self(0);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(index as RawHandle + 1)
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        assert!(self.0 != 0, "`Handle::to_index()` - the sentinel has no arena slot!");
        (self.0 - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

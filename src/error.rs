use thiserror::Error;

/// The error type for fallible [`AATreeMap`](crate::AATreeMap) and
/// [`AATreeList`](crate::AATreeList) operations.
///
/// Both variants signal caller misuse, detected before any structural edit: a failing
/// call never modifies the container.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    NotFound,
    /// The requested index is outside the valid range for the operation.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the sequence at the time of the call.
        len: usize,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::NotFound.to_string(), "key not found");
        assert_eq!(
            Error::OutOfRange { index: 5, len: 2 }.to_string(),
            "index 5 out of range for length 2"
        );
    }
}

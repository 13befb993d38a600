//! Monotonic version counter.

use std::fmt;

/// A version token stamped on a resource when it is created or mutated.
///
/// Rendered on the wire as its bare decimal value (e.g. `ETag: 7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ETag(pub u64);

impl ETag {
    /// Version of a collection that has never been written.
    pub const INITIAL: ETag = ETag(0);

    /// Literal comparison against a header value.
    pub fn matches(&self, header: &str) -> bool {
        header == self.to_string()
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ETag> for u64 {
    fn from(etag: ETag) -> Self {
        etag.0
    }
}

/// Issues strictly increasing ETags.
///
/// Takes `&mut self`, so callers must serialize access (the store keeps it
/// behind the same lock as the data it versions).
#[derive(Debug, Default)]
pub struct VersionCounter {
    last: u64,
}

impl VersionCounter {
    /// Create a counter whose first issued value is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next version.
    pub fn next(&mut self) -> ETag {
        self.last += 1;
        ETag(self.last)
    }

    /// The most recently issued version, or `ETag::INITIAL` if none.
    pub fn last(&self) -> ETag {
        ETag(self.last)
    }
}

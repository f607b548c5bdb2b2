//! Index handles into a graph's tensor table

/// Position of a tensor in a graph's tensor table
///
/// Indices are plain handles: they carry no ownership and stay valid for the
/// lifetime of the graph that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorIndex(usize);

impl TensorIndex {
    /// Create from a raw table position
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw table position
    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl From<usize> for TensorIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TensorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tensor({})", self.0)
    }
}

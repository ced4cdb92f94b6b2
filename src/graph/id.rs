use std::fmt;

/// A strong type identifying one composite inside a [`Heap`](super::Heap).
///
/// Two values refer to the same object exactly when their handles are equal. This is the
/// identity the cycle check compares, never structural equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Creates a new ObjectId.
    /// Restricted to the graph module so handles only come out of a heap.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the slot index inside the owning heap.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

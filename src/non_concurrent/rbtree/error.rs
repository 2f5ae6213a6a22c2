use std::fmt::{Debug, Display};


/// Why a tree operation was rejected. A rejected operation never changes the tree.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RBTreeError {
    /// Tried to insert a payload that compares equal to one already in the tree.
    DuplicateKey,
    /// Tried to delete a key that isn't in the tree.
    KeyNotFound,
    /// The allocator couldn't provide memory for a new node.
    AllocationFailure,
}

impl Display for RBTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RBTreeError::DuplicateKey => f.write_str("key is already present in the tree"),
            RBTreeError::KeyNotFound => f.write_str("key is not present in the tree"),
            RBTreeError::AllocationFailure => f.write_str("out of memory while allocating a tree node"),
        }
    }
}

impl std::error::Error for RBTreeError {}


/// A rejected [`insert`], handing the payload back to the caller.
///
/// [`insert`]: super::RBTree::insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError<T> {
    DuplicateKey(T),
    AllocationFailure(T),
}

impl<T> InsertError<T> {
    pub fn kind(&self) -> RBTreeError {
        match self {
            InsertError::DuplicateKey(_) => RBTreeError::DuplicateKey,
            InsertError::AllocationFailure(_) => RBTreeError::AllocationFailure,
        }
    }

    /// The payload that didn't make it into the tree.
    pub fn into_inner(self) -> T {
        match self {
            InsertError::DuplicateKey(value) | InsertError::AllocationFailure(value) => value,
        }
    }
}

impl<T> Display for InsertError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.kind(), f)
    }
}

impl<T: Debug> std::error::Error for InsertError<T> {}

impl<T> From<InsertError<T>> for RBTreeError {
    fn from(err: InsertError<T>) -> Self {
        err.kind()
    }
}


/// Which red-black tree invariant a [`validate`] call found broken.
///
/// [`validate`]: super::RBTree::validate
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root is red.
    RootNotBlack,
    /// Two root-to-leaf paths pass through a different number of black nodes.
    BlackHeightMismatch { expected: usize, found: usize },
    /// A red node has a red child.
    ConsecutiveRed,
    /// The in-order sequence isn't strictly increasing under the comparator.
    OrderViolation,
    /// Some child's parent link doesn't point back at its parent.
    BrokenParentLink,
    /// The stored element count doesn't match the number of reachable nodes.
    SizeMismatch { stored: usize, counted: usize },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::RootNotBlack => f.write_str("root must be black"),
            InvariantViolation::BlackHeightMismatch { expected, found } => write!(f,
                "not all paths between the root and the leaves have the same number of blacks (expected {expected}, found {found})"
            ),
            InvariantViolation::ConsecutiveRed => f.write_str("a red node has a red child"),
            InvariantViolation::OrderViolation => f.write_str("in-order sequence is not strictly increasing"),
            InvariantViolation::BrokenParentLink => f.write_str("a child's parent link does not point back to its parent"),
            InvariantViolation::SizeMismatch { stored, counted } => write!(f,
                "stored size is {stored} but {counted} nodes are reachable from the root"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

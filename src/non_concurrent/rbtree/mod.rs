//! A red-black tree holding payloads ordered by a caller-supplied [`Comparator`].
//!
//! This is an in-memory ordered set for a single writer. It has no internal synchronization:
//! a tree is [`Send`]/[`Sync`] whenever its payloads and capabilities are, so callers that
//! want to share one across threads wrap it in their own lock.
//!
//! Every mutating operation either completes and leaves all the red-black invariants intact, or
//! fails without changing anything. [`RBTree::validate`] re-checks those invariants from scratch.

use std::fmt::Debug;
use std::marker::PhantomData;

mod deletion;
mod error;
mod insertion;
mod node;
mod ordering;
mod rotation;
mod search;
pub mod validator;

pub use error::{InsertError, InvariantViolation, RBTreeError};
pub use node::{Color, NodeRef};
pub use ordering::{Comparator, Disposer, DropDisposer, NaturalOrder};
pub use search::Iter;

use node::{Link, Node};


/// A red-black tree of `T`s, ordered by `C` and released through `D`.
pub struct RBTree<T, C = NaturalOrder, D = DropDisposer>
where
    D: Disposer<T>,
{
    // NOTE: rotations can move the true root around, `settle_root` puts this right again.
    root: Link<T>,
    len: usize,
    comparator: C,
    disposer: D,
    _phantom: PhantomData<Box<Node<T>>>,
}

// SAFETY: the tree uniquely owns all of its nodes, so sending it sends the payloads (and the
//         capabilities) along with it.
unsafe impl<T: Send, C: Send, D: Disposer<T> + Send> Send for RBTree<T, C, D> {}
// SAFETY: `&RBTree` only ever gives out `&T`s and calls `&C` methods, and never mutates a node.
unsafe impl<T: Sync, C: Sync, D: Disposer<T> + Sync> Sync for RBTree<T, C, D> {}

impl<T: Ord> RBTree<T> {
    /// Creates an empty tree ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_parts(NaturalOrder, DropDisposer)
    }
}

impl<T: Ord> Default for RBTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> RBTree<T, C> {
    /// Creates an empty tree ordered by `comparator`, that just drops payloads.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_parts(comparator, DropDisposer)
    }
}

impl<T, C, D: Disposer<T>> RBTree<T, C, D> {
    /// Creates an empty tree ordered by `comparator`, that hands every payload it destroys to `disposer`.
    pub fn with_parts(comparator: C, disposer: D) -> Self {
        Self {
            root: None,
            len: 0,
            comparator,
            disposer,
            _phantom: PhantomData,
        }
    }

    /// The amount of payloads in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Destroys every node, handing each payload to the disposer.
    ///
    /// Leaves an empty (and still usable) tree behind. Does nothing on an empty tree.
    pub fn release(&mut self) {
        let root = self.root.take();
        let count = std::mem::replace(&mut self.len, 0);

        // SAFETY: the whole tree was just unlinked from the handle, so we own every node in it.
        unsafe { release_subtree(root, &mut self.disposer) };

        if count != 0 {
            debug!("Released {count} nodes");
        }
    }

    /// Same as [`RBTree::release`].
    pub fn clear(&mut self) {
        self.release()
    }

    /// Re-derives the root by walking up the parent links from the last known root.
    ///
    /// Every mutating operation has to finish with this, since a rotation at the root leaves the
    /// handle pointing at a node that is no longer on top.
    fn settle_root(&mut self) {
        while let Some(root) = self.root {
            // SAFETY: the last known root is still a live node of this tree
            match unsafe { root.as_ref() }.parent {
                Some(parent) => self.root = Some(parent),
                None => break,
            }
        }
        debug_assert!(self.root.is_none_or(|root| unsafe { root.as_ref() }.parent.is_none()));
    }
}

/// Post-order walk freeing every node below (and including) `link`.
///
/// # Safety
/// The caller must own every node reachable from `link`, and none of them may be used afterwards.
unsafe fn release_subtree<T, D: Disposer<T>>(link: Link<T>, disposer: &mut D) {
    let Some(node) = link else { return };
    let [left, right] = unsafe { node.as_ref() }.children;

    unsafe {
        release_subtree(left, disposer);
        release_subtree(right, disposer);
    }

    // SAFETY: both subtrees are gone, so nothing points down into `node` anymore
    let value = unsafe { Node::free(node) };
    disposer.dispose(value);
}

impl<T, C, D: Disposer<T>> Drop for RBTree<T, C, D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Debug, C, D: Disposer<T>> Debug for RBTree<T, C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C, D: Disposer<T>> IntoIterator for &'a RBTree<T, C, D> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Inserts every payload, dropping the ones that are rejected.
///
/// Duplicates are dropped silently. A payload that couldn't be allocated is dropped as well, with
/// a warning; use [`RBTree::insert`] directly to get it back instead.
impl<T, C: Comparator<T>, D: Disposer<T>> Extend<T> for RBTree<T, C, D> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut num_lost = 0usize;
        for value in iter {
            // a rejected payload was never ours to dispose of
            match self.insert(value) {
                Ok(()) | Err(InsertError::DuplicateKey(_)) => {}
                Err(InsertError::AllocationFailure(_)) => num_lost += 1,
            }
        }
        if num_lost != 0 {
            warn!("Extend dropped {num_lost} payloads that couldn't be allocated");
        }
    }
}

impl<T: Ord> FromIterator<T> for RBTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RBTree::new();
        tree.extend(iter);
        tree
    }
}


#[cfg(test)]
pub(crate) fn initialize_test_logging() {
    use simplelog::*;
    // other tests in this process may have installed it already
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

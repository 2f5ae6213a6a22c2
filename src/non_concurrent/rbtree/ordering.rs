//! The capabilities a tree is built with: how to order payloads, and how to get rid of them.

use std::cmp::Ordering;


/// A total order over payloads.
///
/// Implementations must be consistent for the lifetime of the tree: if `compare` ever changes its
/// mind about two payloads already in the tree, lookups and removals will silently go wrong
/// (though nothing unsound happens).
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F where F: Fn(&T, &T) -> Ordering {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders payloads by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<T: ?Sized + Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}


/// Releases a payload that the tree is destroying.
///
/// The tree calls this exactly once for every payload it destroys: on [`delete`], on
/// [`release`], and when the tree itself is dropped. Payloads that are handed back to the
/// caller (by [`take`], or a rejected [`insert`]) never go through the disposer.
///
/// [`delete`]: super::RBTree::delete
/// [`release`]: super::RBTree::release
/// [`take`]: super::RBTree::take
/// [`insert`]: super::RBTree::insert
pub trait Disposer<T> {
    fn dispose(&mut self, value: T);
}

impl<T, F> Disposer<T> for F where F: FnMut(T) {
    fn dispose(&mut self, value: T) {
        self(value)
    }
}

/// Just drops the payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct DropDisposer;

impl<T> Disposer<T> for DropDisposer {
    fn dispose(&mut self, value: T) {
        drop(value)
    }
}

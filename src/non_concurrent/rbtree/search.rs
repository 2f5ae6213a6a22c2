use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::ControlFlow;
use std::ptr::NonNull;

use super::node::{Direction, Link, Node, NodeRef};
use super::{Comparator, Disposer, RBTree};


/// Where a key lives in the tree, or where it would be attached if it were inserted.
pub(super) enum Slot<T> {
    Occupied(NonNull<Node<T>>),
    Vacant { parent: Link<T>, dir: Direction },
}

impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Complexity: O(log(n))
    pub(super) fn find_slot(&self, key: &T) -> Slot<T> {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut current = self.root;

        while let Some(node) = current {
            // SAFETY: every node reachable from the root is live while we borrow the tree
            let n = unsafe { node.as_ref() };
            dir = match self.comparator.compare(key, &n.value) {
                Ordering::Equal => return Slot::Occupied(node),
                Ordering::Greater => Direction::Right,
                Ordering::Less => Direction::Left,
            };
            parent = current;
            current = n[dir];
        }

        Slot::Vacant { parent, dir }
    }

    pub(super) fn search(&self, key: &T) -> Link<T> {
        match self.find_slot(key) {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Whether a payload comparing equal to `key` is in the tree.
    ///
    /// Complexity: O(log(n))
    pub fn contains(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// The stored payload comparing equal to `key`, if any.
    pub fn get(&self, key: &T) -> Option<&T> {
        // SAFETY: the node is live for as long as `self` is borrowed
        self.search(key).map(|node| unsafe { &(*node.as_ptr()).value })
    }
}

impl<T, C, D: Disposer<T>> RBTree<T, C, D> {
    fn extreme(&self, dir: Direction) -> Option<&T> {
        let root = self.root?;
        // SAFETY: every node reachable from the root is live while we borrow the tree
        Some(unsafe { &(*Node::extreme(root, dir).as_ptr()).value })
    }

    /// The smallest payload in the tree.
    pub fn first(&self) -> Option<&T> {
        self.extreme(Direction::Left)
    }

    /// The largest payload in the tree.
    pub fn last(&self) -> Option<&T> {
        self.extreme(Direction::Right)
    }

    /// The root node, for looking at the tree's actual shape.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        // SAFETY: the root stays put for as long as `self` is borrowed
        self.root.map(|root| unsafe { NodeRef::new(root) })
    }

    /// Calls `visitor` on every payload in ascending order.
    ///
    /// The walk stops at the first [`ControlFlow::Break`], which is passed back to the caller.
    /// If every call says [`ControlFlow::Continue`], so does `for_each`.
    pub fn for_each<'a, B, F>(&'a self, mut visitor: F) -> ControlFlow<B>
    where
        F: FnMut(&'a T) -> ControlFlow<B>,
    {
        // SAFETY: the tree is borrowed for the whole walk, so nothing gets freed under us
        unsafe { in_order(self.root, &mut visitor) }
    }

    /// An iterator over the payloads in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = match self.root {
            // SAFETY: every node reachable from the root is live while we borrow the tree
            Some(root) => unsafe {
                (Some(Node::extreme(root, Direction::Left)), Some(Node::extreme(root, Direction::Right)))
            },
            None => (None, None),
        };
        Iter { front, back, remaining: self.len, _phantom: PhantomData }
    }
}

/// # Safety
/// Every node reachable from `link` must be live for the whole walk.
unsafe fn in_order<'a, T: 'a, B, F>(link: Link<T>, visitor: &mut F) -> ControlFlow<B>
where
    F: FnMut(&'a T) -> ControlFlow<B>,
{
    let Some(node) = link else { return ControlFlow::Continue(()) };
    let node: &'a Node<T> = unsafe { node.as_ref() };

    unsafe { in_order(node[Direction::Left], visitor) }?;
    visitor(&node.value)?;
    unsafe { in_order(node[Direction::Right], visitor) }
}


/// In-order iterator over an [`RBTree`], created by [`RBTree::iter`].
///
/// Steps between nodes through the parent links, so it doesn't need a stack.
pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    // NOTE: this is what stops `front` and `back` from walking past each other
    remaining: usize,
    _phantom: PhantomData<&'a T>,
}

// SAFETY: an `Iter` only hands out `&T`s, exactly like a `&RBTree` would.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { front: self.front, back: self.back, remaining: self.remaining, _phantom: PhantomData }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 { return None }
        let node = self.front?;
        self.remaining -= 1;

        // SAFETY: the tree is borrowed for `'a`, so no node is freed or relinked while we exist
        unsafe {
            self.front = Node::neighbour(node, Direction::Right);
            Some(&(*node.as_ptr()).value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 { return None }
        let node = self.back?;
        self.remaining -= 1;

        // SAFETY: see `next`
        unsafe {
            self.back = Node::neighbour(node, Direction::Left);
            Some(&(*node.as_ptr()).value)
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

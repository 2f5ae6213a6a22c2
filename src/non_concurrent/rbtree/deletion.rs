use std::ptr::NonNull;

use super::node::{is_red, Color, Direction, Link, Node};
use super::rotation::rotate;
use super::{Comparator, Disposer, RBTree, RBTreeError};


impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Removes the payload comparing equal to `key`, handing it to the disposer.
    ///
    /// Fails, without touching the tree, if there is no such payload.
    ///
    /// Complexity: O(log(n))
    pub fn delete(&mut self, key: &T) -> Result<(), RBTreeError> {
        let Some(value) = self.take(key) else {
            debug!("Rejected delete of a key not in the tree");
            return Err(RBTreeError::KeyNotFound)
        };
        self.disposer.dispose(value);
        Ok(())
    }

    /// Removes the payload comparing equal to `key` and gives it back, without disposing of it.
    pub fn take(&mut self, key: &T) -> Option<T> {
        let node = self.search(key)?;
        // SAFETY: `search` only returns live nodes of this tree
        Some(unsafe { self.remove(node) })
    }
}

impl<T, C, D: Disposer<T>> RBTree<T, C, D> {
    /// Removes and returns the smallest payload, without disposing of it.
    pub fn pop_first(&mut self) -> Option<T> {
        self.pop(Direction::Left)
    }

    /// Removes and returns the largest payload, without disposing of it.
    pub fn pop_last(&mut self) -> Option<T> {
        self.pop(Direction::Right)
    }

    fn pop(&mut self, dir: Direction) -> Option<T> {
        let root = self.root?;
        // SAFETY: every node reachable from the root is live
        Some(unsafe { self.remove(Node::extreme(root, dir)) })
    }

    /// Unlinks `node`'s payload from the tree, rebalances, and frees the node that ended up empty.
    ///
    /// # Safety
    /// `node` must be a live node of this tree.
    unsafe fn remove(&mut self, node: NonNull<Node<T>>) -> T {
        let mut target = node;

        // with two children, trade payloads with the in-order successor (which has no left child)
        // and take out the successor's node instead. ordering is preserved since nothing sits in between.
        if let [Some(_), Some(right)] = unsafe { target.as_ref() }.children {
            let successor = unsafe { Node::extreme(right, Direction::Left) };
            unsafe { std::ptr::swap(&raw mut (*target.as_ptr()).value, &raw mut (*successor.as_ptr()).value) };
            target = successor;
        }

        let (color, parent, child) = {
            let t = unsafe { target.as_ref() };
            (t.color, t.parent, t[Direction::Left].or(t[Direction::Right]))
        };
        let side = parent.map(|parent| unsafe { Node::child_side(parent, target) });

        match color {
            Color::Red => {
                // a red node with at most one child has none, or the black heights wouldn't match
                debug_assert!(child.is_none(), "red node with a single child");
                trace!("Delete: detaching red leaf {target:016x?}");
                unsafe { self.replace_child(parent, side, None) };
            }
            Color::Black if unsafe { is_red(child) } => {
                trace!("Delete: splicing red child into black node {target:016x?}");
                if let Some(child) = child {
                    unsafe {
                        self.replace_child(parent, side, Some(child));
                        (*child.as_ptr()).parent = parent;
                        (*child.as_ptr()).color = Color::Black;
                    }
                }
            }
            Color::Black => {
                // a black node whose only child is black can't exist, so this is a leaf
                debug_assert!(child.is_none(), "black node with a single black child");
                unsafe { self.replace_child(parent, side, None) };

                // taking a black leaf out leaves its side one black short
                if let (Some(parent), Some(side)) = (parent, side) {
                    trace!("Delete: detached black leaf {target:016x?}, repairing under {parent:016x?}");
                    unsafe { repair_after_delete(parent, side) };
                }
            }
        }

        self.len -= 1;
        self.settle_root();

        // SAFETY: `target` has been unlinked, and nothing points at it anymore
        unsafe { Node::free(target) }
    }

    /// Puts `replacement` where `parent`'s `side` child used to be, or makes it the root.
    ///
    /// Doesn't touch `replacement`'s own parent link.
    ///
    /// # Safety
    /// `parent`, if present, must be live.
    unsafe fn replace_child(&mut self, parent: Link<T>, side: Option<Direction>, replacement: Link<T>) {
        match (parent, side) {
            (Some(parent), Some(side)) => unsafe { (&mut *parent.as_ptr())[side] = replacement },
            _ => self.root = replacement,
        }
    }
}

/// Repairs the black-height deficit on `parent`'s `side` after a black node was taken out of it.
///
/// Every path through that side has one black node too few compared to the sibling's side. Each
/// step either fixes that locally with recoloring and at most two rotations, or moves the deficit
/// one level up (and stops once it reaches the root, which takes it out of every path at once).
///
/// # Safety
/// `parent` must be live, and the tree must be valid apart from that one deficit.
unsafe fn repair_after_delete<T>(mut parent: NonNull<Node<T>>, mut side: Direction) {
    loop {
        let Some(sibling) = (unsafe { parent.as_ref() })[side.opposite()] else {
            // the short side had black height 1 before, so the sibling side must have held a node
            return
        };

        if unsafe { sibling.as_ref() }.color == Color::Red {
            // red sibling: rotate it above `parent`, which leaves a black sibling to deal with
            trace!("Delete fixup: red sibling {sibling:016x?}, rotating {parent:016x?} down");
            unsafe {
                (*sibling.as_ptr()).color = Color::Black;
                (*parent.as_ptr()).color = Color::Red;
                rotate(parent, side);
            }
            continue
        }

        let (near, far) = {
            let s = unsafe { sibling.as_ref() };
            (s[side], s[side.opposite()])
        };

        if unsafe { !is_red(near) && !is_red(far) } {
            // take a black out of the sibling's side too, then either `parent` absorbs it...
            unsafe { (*sibling.as_ptr()).color = Color::Red };
            if unsafe { parent.as_ref() }.color == Color::Red {
                trace!("Delete fixup: black sibling with black children, blackening {parent:016x?}");
                unsafe { (*parent.as_ptr()).color = Color::Black };
                return
            }

            // ...or the whole subtree at `parent` is now short, one level up
            trace!("Delete fixup: deficit moves up past {parent:016x?}");
            let Some(grandparent) = (unsafe { parent.as_ref() }).parent else { return };
            side = unsafe { Node::child_side(grandparent, parent) };
            parent = grandparent;
            continue
        }

        if unsafe { !is_red(far) } {
            // only the near nephew is red: rotate it above the sibling so that the far one is red
            trace!("Delete fixup: red near nephew, rotating {sibling:016x?} away");
            unsafe {
                if let Some(near) = near {
                    (*near.as_ptr()).color = Color::Black;
                }
                (*sibling.as_ptr()).color = Color::Red;
                rotate(sibling, side.opposite());
            }
            continue
        }

        // red far nephew: rotating the sibling above `parent` puts an extra black on the short side
        trace!("Delete fixup: red far nephew, rotating {parent:016x?} down");
        unsafe {
            (*sibling.as_ptr()).color = parent.as_ref().color;
            (*parent.as_ptr()).color = Color::Black;
            if let Some(far) = far {
                (*far.as_ptr()).color = Color::Black;
            }
            rotate(parent, side);
        }
        return
    }
}

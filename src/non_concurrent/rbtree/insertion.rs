use std::ptr::NonNull;

use super::node::{is_red, Color, Node};
use super::rotation::rotate;
use super::search::Slot;
use super::{Comparator, Disposer, InsertError, RBTree};


impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Inserts a payload into the tree.
    ///
    /// Fails, without touching the tree, if an equal payload is already present or if there is no
    /// memory left for a new node. Either way the payload is handed back inside the error.
    ///
    /// Complexity: O(log(n))
    pub fn insert(&mut self, value: T) -> Result<(), InsertError<T>> {
        let (parent, dir) = match self.find_slot(&value) {
            Slot::Occupied(_) => {
                debug!("Rejected insert of a key already in the tree");
                return Err(InsertError::DuplicateKey(value))
            }
            Slot::Vacant { parent, dir } => (parent, dir),
        };

        let node = match Node::allocate(value, parent) {
            Ok(node) => node,
            Err(value) => {
                warn!("Out of memory allocating a node for a tree of {} elements", self.len);
                return Err(InsertError::AllocationFailure(value))
            }
        };

        match parent {
            // SAFETY: `find_slot` just told us this slot of `parent` is empty
            Some(parent) => unsafe { (&mut *parent.as_ptr())[dir] = Some(node) },
            None => self.root = Some(node),
        }
        self.len += 1;

        // SAFETY: `node` is a freshly linked red leaf, so it's the only thing that can be wrong
        unsafe { repair_after_insert(node) };
        self.settle_root();

        Ok(())
    }
}

/// Restores the red-black invariants after `node` was attached as a red leaf.
///
/// The only thing that can be broken is `node` being red under a red parent (or being a red root).
/// That gets fixed with at most two rotations, or pushed two levels up by recoloring.
///
/// # Safety
/// `node` must be live and red, and the tree must be valid everywhere except directly at `node`.
unsafe fn repair_after_insert<T>(mut node: NonNull<Node<T>>) {
    loop {
        let Some(parent) = (unsafe { node.as_ref() }).parent else {
            // `node` is the whole tree above here: the root is always black
            trace!("Insert fixup: {node:016x?} is the root, recoloring it black");
            unsafe { (*node.as_ptr()).color = Color::Black };
            return
        };

        if unsafe { parent.as_ref() }.color == Color::Black {
            return
        }

        // NOTE: a red parent can't be the root, so there is always a grandparent. if there isn't,
        //       blackening the parent is all it takes.
        let Some(grandparent) = (unsafe { parent.as_ref() }).parent else {
            unsafe { (*parent.as_ptr()).color = Color::Black };
            return
        };

        let parent_side = unsafe { Node::child_side(grandparent, parent) };
        let uncle = unsafe { grandparent.as_ref() }[parent_side.opposite()];

        if unsafe { is_red(uncle) } {
            trace!("Insert fixup: red uncle, pushing the red up to {grandparent:016x?}");
            unsafe {
                (*parent.as_ptr()).color = Color::Black;
                if let Some(uncle) = uncle {
                    (*uncle.as_ptr()).color = Color::Black;
                }
                (*grandparent.as_ptr()).color = Color::Red;
            }
            node = grandparent;
            continue
        }

        // black (or missing) uncle: rotate the red pair above the grandparent
        let mut top = parent;
        if unsafe { parent.as_ref() }[parent_side.opposite()] == Some(node) {
            // `node` is the inner grandchild, straighten the chain first
            trace!("Insert fixup: straightening bent chain at {parent:016x?}");
            unsafe { rotate(parent, parent_side) };
            top = node;
        }

        trace!("Insert fixup: rotating {grandparent:016x?} under {top:016x?}");
        unsafe {
            rotate(grandparent, parent_side.opposite());
            (*top.as_ptr()).color = Color::Black;
            (*grandparent.as_ptr()).color = Color::Red;
        }
        return
    }
}

//! Independent checks of every red-black tree invariant.
//!
//! Nothing in here shares code with the insertion and deletion paths, and nothing on those paths
//! calls in here: this is for tests and diagnostics. Every check walks the tree from scratch
//! through its child links.

use std::cmp::Ordering;
use std::ptr::NonNull;

use super::node::{Color, Direction, Link, Node};
use super::{Comparator, Disposer, InvariantViolation, RBTree};


impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Checks every red-black tree invariant, reporting the first one found broken.
    ///
    /// Complexity: O(n)
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.find_violation();
        if let Err(violation) = result {
            error!("Invalid red-black tree ({} elements): {violation}", self.len);
        }
        result
    }

    fn find_violation(&self) -> Result<(), InvariantViolation> {
        if !root_is_black(self) {
            return Err(InvariantViolation::RootNotBlack)
        }
        if let Some((expected, found)) = black_height_mismatch(self.root) {
            return Err(InvariantViolation::BlackHeightMismatch { expected, found })
        }
        if !no_consecutive_reds(self) {
            return Err(InvariantViolation::ConsecutiveRed)
        }
        if !is_ordered(self) {
            return Err(InvariantViolation::OrderViolation)
        }
        if !parent_links_consistent(self) {
            return Err(InvariantViolation::BrokenParentLink)
        }
        let counted = count_nodes(self.root);
        if counted != self.len {
            return Err(InvariantViolation::SizeMismatch { stored: self.len, counted })
        }
        Ok(())
    }
}

/// The root, if there is one, is black.
pub fn root_is_black<T, C, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    match tree.root {
        // SAFETY: (for all of these checks) every node reachable from the root of a borrowed tree is live
        Some(root) => unsafe { root.as_ref() }.color == Color::Black,
        None => true,
    }
}

/// Every path from the root down to a null leaf passes through the same amount of black nodes.
pub fn black_height_consistent<T, C, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    black_height_mismatch(tree.root).is_none()
}

/// No red node has a red child.
pub fn no_consecutive_reds<T, C, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    fn check<T>(link: Link<T>, parent_red: bool) -> bool {
        let Some(node) = link else { return true };
        let n = unsafe { node.as_ref() };
        let red = n.color == Color::Red;
        if red && parent_red {
            return false
        }
        check(n[Direction::Left], red) && check(n[Direction::Right], red)
    }
    check(tree.root, false)
}

/// The in-order sequence of payloads is strictly increasing under the tree's comparator.
pub fn is_ordered<T, C: Comparator<T>, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    fn check<T, C: Comparator<T>>(link: Link<T>, comparator: &C, previous: &mut Option<NonNull<Node<T>>>) -> bool {
        let Some(node) = link else { return true };
        let n = unsafe { node.as_ref() };

        if !check(n[Direction::Left], comparator, previous) {
            return false
        }
        if let Some(prev) = *previous {
            if comparator.compare(unsafe { &prev.as_ref().value }, &n.value) != Ordering::Less {
                return false
            }
        }
        *previous = Some(node);
        check(n[Direction::Right], comparator, previous)
    }
    check(tree.root, &tree.comparator, &mut None)
}

/// Every child points back at its parent, and the root has no parent.
pub fn parent_links_consistent<T, C, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    fn check<T>(node: NonNull<Node<T>>) -> bool {
        let n = unsafe { node.as_ref() };
        n.children.into_iter().flatten().all(|child| {
            unsafe { child.as_ref() }.parent == Some(node) && check(child)
        })
    }
    match tree.root {
        Some(root) => unsafe { root.as_ref() }.parent.is_none() && check(root),
        None => true,
    }
}

/// The stored element count is the amount of nodes reachable from the root.
pub fn size_matches<T, C, D: Disposer<T>>(tree: &RBTree<T, C, D>) -> bool {
    count_nodes(tree.root) == tree.len
}

fn count_nodes<T>(link: Link<T>) -> usize {
    match link {
        Some(node) => {
            let [left, right] = unsafe { node.as_ref() }.children;
            1 + count_nodes(left) + count_nodes(right)
        }
        None => 0,
    }
}

/// Counts blacks down the leftmost path (null leaf included), then checks every other path against it.
///
/// Returns `(expected, found)` for the first path that disagrees.
fn black_height_mismatch<T>(root: Link<T>) -> Option<(usize, usize)> {
    fn blacks<T>(node: &Node<T>) -> usize {
        (node.color == Color::Black) as usize
    }

    fn check<T>(link: Link<T>, mut count: usize, expected: usize) -> Option<(usize, usize)> {
        let Some(node) = link else {
            let found = count + 1;
            return (found != expected).then_some((expected, found))
        };
        let n = unsafe { node.as_ref() };
        count += blacks(n);
        check(n[Direction::Left], count, expected).or_else(|| check(n[Direction::Right], count, expected))
    }

    let mut expected = 1;
    let mut current = root;
    while let Some(node) = current {
        let n = unsafe { node.as_ref() };
        expected += blacks(n);
        current = n[Direction::Left];
    }

    check(root, 0, expected)
}

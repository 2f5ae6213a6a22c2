use std::ptr::NonNull;

use super::node::{Direction, Node};


/// Rotates `node` down towards `dir`, lifting its child on the other side (the pivot) into its place.
///
/// ```text
///        n                  p
///       / \                / \
///      a   p      -->     n   c        (dir = Left, a "left rotation")
///         / \            / \
///        b   c          a   b
/// ```
///
/// The pivot's inner child (`b`) is re-parented onto `node`, and whatever pointed at `node` from
/// above now points at the pivot. In-order sequence is unchanged.
///
/// This only rewires links between nodes: if `node` was the root, the pivot comes out with no
/// parent and the tree handle's root slot is stale until the handle re-derives it.
///
/// Returns the pivot.
///
/// # Safety
/// `node` and its neighbours must be live, and `node` must have a child on `dir.opposite()`.
pub(super) unsafe fn rotate<T>(node: NonNull<Node<T>>, dir: Direction) -> NonNull<Node<T>> {
    let n = node.as_ptr();
    let pivot = unsafe { (&*n)[dir.opposite()] };
    debug_assert!(pivot.is_some(), "rotating {dir:?} at a node without a pivot");
    // SAFETY: asserted by caller
    let pivot = unsafe { pivot.unwrap_unchecked() };
    let p = pivot.as_ptr();

    let parent = unsafe { (*n).parent };
    let side = unsafe { Node::side(node) };

    trace!("Rotating {dir:?} at {node:016x?} (pivot {pivot:016x?})");

    // SAFETY: every pointer touched here is `node`, its pivot, the pivot's inner child or `node`'s
    //         parent, all of which the caller guarantees are live.
    unsafe {
        // the pivot's inner subtree crosses over to `node`
        let inner = (&*p)[dir];
        (&mut *n)[dir.opposite()] = inner;
        if let Some(inner) = inner {
            (*inner.as_ptr()).parent = Some(node);
        }

        // `node` hangs under the pivot
        (&mut *p)[dir] = Some(node);
        (*n).parent = Some(pivot);

        // and the pivot takes `node`'s old spot
        (*p).parent = parent;
        if let (Some(parent), Some(side)) = (parent, side) {
            (&mut *parent.as_ptr())[side] = Some(pivot);
        }
    }

    pivot
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::non_concurrent::rbtree::node::Link;

    unsafe fn attach(parent: NonNull<Node<char>>, dir: Direction, value: char) -> NonNull<Node<char>> {
        let child = Node::allocate(value, Some(parent)).unwrap();
        unsafe { (&mut *parent.as_ptr())[dir] = Some(child) };
        child
    }

    unsafe fn value(link: Link<char>) -> Option<char> {
        link.map(|node| unsafe { node.as_ref() }.value)
    }

    unsafe fn free_all(link: Link<char>) {
        if let Some(node) = link {
            unsafe {
                let [l, r] = node.as_ref().children;
                free_all(l);
                free_all(r);
                Node::free(node);
            }
        }
    }

    #[test]
    fn rotate_left_then_right_restores_shape() {
        //   g
        //    \
        //     n
        //    / \
        //   a   p
        //      / \
        //     b   c
        unsafe {
            let g = Node::allocate('g', None).unwrap();
            let n = attach(g, Direction::Right, 'n');
            let a = attach(n, Direction::Left, 'a');
            let p = attach(n, Direction::Right, 'p');
            let b = attach(p, Direction::Left, 'b');
            let c = attach(p, Direction::Right, 'c');

            let pivot = rotate(n, Direction::Left);
            assert_eq!(pivot, p);

            // g's slot now holds the pivot, and every link points both ways
            assert_eq!(g.as_ref()[Direction::Right], Some(p));
            assert_eq!(p.as_ref().parent, Some(g));
            assert_eq!(value(p.as_ref()[Direction::Left]), Some('n'));
            assert_eq!(value(p.as_ref()[Direction::Right]), Some('c'));
            assert_eq!(n.as_ref().parent, Some(p));
            assert_eq!(n.as_ref()[Direction::Left], Some(a));
            assert_eq!(n.as_ref()[Direction::Right], Some(b));
            assert_eq!(b.as_ref().parent, Some(n));
            assert_eq!(c.as_ref().parent, Some(p));
            assert_eq!(a.as_ref().parent, Some(n));

            let back = rotate(p, Direction::Right);
            assert_eq!(back, n);
            assert_eq!(g.as_ref()[Direction::Right], Some(n));
            assert_eq!(n.as_ref()[Direction::Right], Some(p));
            assert_eq!(p.as_ref()[Direction::Left], Some(b));
            assert_eq!(b.as_ref().parent, Some(p));

            free_all(Some(g));
        }
    }

    #[test]
    fn rotating_the_root_leaves_pivot_parentless() {
        //     n            l
        //    /              \
        //   l       -->      n
        unsafe {
            let n = Node::allocate('n', None).unwrap();
            let l = attach(n, Direction::Left, 'l');

            let pivot = rotate(n, Direction::Right);
            assert_eq!(pivot, l);
            assert!(l.as_ref().parent.is_none());
            assert_eq!(l.as_ref()[Direction::Right], Some(n));
            assert!(n.as_ref()[Direction::Left].is_none());

            free_all(Some(l));
        }
    }
}

use std::alloc::{alloc, Layout};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;


/// An edge to a child (or parent) node. `None` is the "null leaf", which counts as black.
pub(super) type Link<T> = Option<NonNull<Node<T>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Which child slot of a node something lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(super) fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

/// A single tree element.
///
/// The `children` edges are owning: freeing a node is the job of whoever unlinks it from its
/// parent's slot. `parent` is a plain back-reference and never owns anything.
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) color: Color,
    pub(super) parent: Link<T>,
    pub(super) children: [Link<T>; 2],
}

impl<T> Index<Direction> for Node<T> {
    type Output = Link<T>;

    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Left => &self.children[0],
            Direction::Right => &self.children[1],
        }
    }
}

impl<T> IndexMut<Direction> for Node<T> {
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Left => &mut self.children[0],
            Direction::Right => &mut self.children[1],
        }
    }
}

impl<T> Node<T> {
    /// Allocates a new red leaf hanging off of `parent`.
    ///
    /// Hands `value` back if the allocator is out of memory, instead of aborting like `Box::new` would.
    /// The caller is responsible for linking the node into `parent`'s child slot.
    pub(super) fn allocate(value: T, parent: Link<T>) -> Result<NonNull<Node<T>>, T> {
        let layout = Layout::new::<Node<T>>();

        // SAFETY: a `Node<T>` always holds three pointers, so `layout` is never zero-sized.
        let ptr = unsafe { alloc(layout) }.cast::<Node<T>>();
        let Some(ptr) = NonNull::new(ptr) else { return Err(value) };

        // SAFETY: `ptr` was just allocated with the layout of a `Node<T>`, so it is aligned and writable.
        unsafe {
            ptr.write(Node {
                value,
                color: Color::Red,
                parent,
                children: [None, None],
            })
        };

        Ok(ptr)
    }

    /// Deallocates a node, handing back its payload.
    ///
    /// # Safety
    /// `node` must have come from [`Node::allocate`], must not be reachable from any tree anymore,
    /// and must not be used again afterwards.
    pub(super) unsafe fn free(node: NonNull<Node<T>>) -> T {
        // SAFETY: `allocate` used the global allocator with `Layout::new::<Node<T>>()`,
        //         which is exactly what `Box<Node<T>>` expects.
        let boxed = unsafe { Box::from_raw(node.as_ptr()) };
        boxed.value
    }

    /// Which side of its parent `node` hangs on, or `None` for the root.
    ///
    /// # Safety
    /// `node` and its parent (if any) must be live.
    pub(super) unsafe fn side(node: NonNull<Node<T>>) -> Option<Direction> {
        let parent = unsafe { node.as_ref() }.parent?;
        Some(unsafe { Node::child_side(parent, node) })
    }

    /// Which of `parent`'s slots holds `child`.
    ///
    /// # Safety
    /// `parent` must be live, and `child` must be one of its children.
    pub(super) unsafe fn child_side(parent: NonNull<Node<T>>, child: NonNull<Node<T>>) -> Direction {
        match unsafe { parent.as_ref() }[Direction::Left] == Some(child) {
            true => Direction::Left,
            false => Direction::Right,
        }
    }

    /// Walks down `dir` edges as far as possible.
    ///
    /// # Safety
    /// Every node reachable from `node` must be live.
    pub(super) unsafe fn extreme(mut node: NonNull<Node<T>>, dir: Direction) -> NonNull<Node<T>> {
        while let Some(next) = unsafe { node.as_ref() }[dir] {
            node = next;
        }
        node
    }

    /// The in-order neighbour of `node` in direction `dir` (`Right` for the successor,
    /// `Left` for the predecessor).
    ///
    /// # Safety
    /// `node` and every node reachable from it through child and parent links must be live.
    pub(super) unsafe fn neighbour(node: NonNull<Node<T>>, dir: Direction) -> Link<T> {
        if let Some(child) = unsafe { node.as_ref() }[dir] {
            return Some(unsafe { Node::extreme(child, dir.opposite()) })
        }

        // climb until we come up out of a subtree on its `dir.opposite()` side
        let mut current = node;
        loop {
            let parent = unsafe { current.as_ref() }.parent?;
            if unsafe { Node::side(current) } == Some(dir.opposite()) {
                return Some(parent)
            }
            current = parent;
        }
    }
}

/// A shared view of one node of an [`RBTree`], for diagnostics and structural exports.
///
/// [`RBTree`]: super::RBTree
pub struct NodeRef<'a, T> {
    node: NonNull<Node<T>>,
    _phantom: PhantomData<&'a Node<T>>,
}

impl<T> Copy for NodeRef<'_, T> {}
impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self { *self }
}

impl<'a, T> NodeRef<'a, T> {
    /// # Safety
    /// `node` must stay live and unmodified for `'a`.
    pub(super) unsafe fn new(node: NonNull<Node<T>>) -> Self {
        Self { node, _phantom: PhantomData }
    }

    fn get(&self) -> &'a Node<T> {
        // SAFETY: guaranteed by whoever constructed us, the tree is borrowed for `'a`.
        unsafe { self.node.as_ref() }
    }

    fn wrap(link: Link<T>) -> Option<Self> {
        // SAFETY: every node reachable from a live node of a shared-borrowed tree is live.
        link.map(|node| unsafe { Self::new(node) })
    }

    pub fn value(&self) -> &'a T {
        &self.get().value
    }

    pub fn color(&self) -> Color {
        self.get().color
    }

    pub fn left(&self) -> Option<Self> {
        Self::wrap(self.get()[Direction::Left])
    }

    pub fn right(&self) -> Option<Self> {
        Self::wrap(self.get()[Direction::Right])
    }

    pub fn parent(&self) -> Option<Self> {
        Self::wrap(self.get().parent)
    }
}

impl<T: Debug> Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("value", self.value())
            .field("color", &self.color())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

/// Color of a possibly-absent node. Null leaves are black.
///
/// # Safety
/// `link`, if present, must point to a live node.
pub(super) unsafe fn color_of<T>(link: Link<T>) -> Color {
    match link {
        Some(node) => unsafe { node.as_ref() }.color,
        None => Color::Black,
    }
}

/// # Safety
/// See [`color_of`].
pub(super) unsafe fn is_red<T>(link: Link<T>) -> bool {
    unsafe { color_of(link) == Color::Red }
}

use std::cmp::Ordering;
use std::ops::ControlFlow;

use crate::non_concurrent::rbtree::{Disposer, RBTree};


/// Lexicographic (byte-wise) order on words.
pub fn string_compare<S: AsRef<str>>(a: &S, b: &S) -> Ordering {
    a.as_ref().as_bytes().cmp(b.as_ref().as_bytes())
}

/// A [`RBTree::for_each`] visitor appending every word it sees to `buffer`, each followed by a newline.
///
/// Never stops the walk early.
pub fn concatenate<S: AsRef<str>>(buffer: &mut String) -> impl FnMut(&S) -> ControlFlow<()> {
    move |word: &S| {
        buffer.push_str(word.as_ref());
        buffer.push('\n');
        ControlFlow::Continue(())
    }
}

/// Every word in the tree, in order, one per line.
pub fn concatenate_all<S: AsRef<str>, C, D: Disposer<S>>(tree: &RBTree<S, C, D>) -> String {
    let mut buffer = String::new();
    let _ = tree.for_each(concatenate(&mut buffer));
    buffer
}

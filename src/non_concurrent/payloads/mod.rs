//! Ready-made payloads for [`RBTree`](super::rbtree::RBTree): words and numeric vectors, each with
//! a comparator and a visitor or two.
//!
//! These only use the tree's public interface.

mod strings;
mod vectors;

pub use strings::{concatenate, concatenate_all, string_compare};
pub use vectors::{find_max_norm_vector, vector_compare_1by1, Vector, PROXIMITY};

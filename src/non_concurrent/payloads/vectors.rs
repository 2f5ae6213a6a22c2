use std::cmp::Ordering;
use std::ops::ControlFlow;

use crate::non_concurrent::rbtree::{Disposer, RBTree};


/// Coordinates closer together than this are considered equal by [`vector_compare_1by1`].
pub const PROXIMITY: f64 = 0.01;

/// A vector of any length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vector {
    pub coords: Vec<f64>,
}

impl Vector {
    pub fn new(coords: Vec<f64>) -> Self {
        Self { coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The squared L2 norm. Zero for an empty vector.
    pub fn norm_squared(&self) -> f64 {
        self.coords.iter().map(|x| x * x).sum()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

/// Compares element by element: the first coordinate that differs by more than [`PROXIMITY`] decides.
///
/// If one vector is a prefix of the other (up to [`PROXIMITY`]), the shorter one is smaller.
pub fn vector_compare_1by1(a: &Vector, b: &Vector) -> Ordering {
    for (x, y) in a.coords.iter().zip(&b.coords) {
        let diff = x - y;
        if diff > PROXIMITY {
            return Ordering::Greater
        }
        if diff < -PROXIMITY {
            return Ordering::Less
        }
    }
    a.len().cmp(&b.len())
}

/// What an empty vector counts as when looking for the largest norm, so any real vector beats it.
const EMPTY_NORM: f64 = -1.0;

/// A copy of the vector with the largest norm in the tree, or an empty vector if the tree is empty.
///
/// Empty vectors lose to every non-empty one, even `[0.0]`. On ties, the vector that comes first in
/// the tree's order wins.
pub fn find_max_norm_vector<C, D: Disposer<Vector>>(tree: &RBTree<Vector, C, D>) -> Vector {
    let mut max: Option<&Vector> = None;
    let mut max_norm = EMPTY_NORM;

    let _ = tree.for_each(|vector| {
        let norm = if vector.is_empty() { EMPTY_NORM } else { vector.norm_squared() };
        if norm > max_norm {
            max = Some(vector);
            max_norm = norm;
        }
        ControlFlow::<()>::Continue(())
    });

    max.cloned().unwrap_or_default()
}

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use rbtree::non_concurrent::payloads::{concatenate_all, string_compare};
use rbtree::non_concurrent::rbtree::{Color, NaturalOrder, NodeRef, RBTree, RBTreeError, validator};


/// xorshift64, so every run sees the same "random" orders.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

/// Pre-order dump of values and colors, enough to tell whether anything moved.
fn snapshot<T: Copy>(tree: &RBTree<T>) -> Vec<(T, Color)> {
    fn walk<T: Copy>(node: Option<NodeRef<'_, T>>, out: &mut Vec<(T, Color)>) {
        let Some(node) = node else { return };
        out.push((*node.value(), node.color()));
        walk(node.left(), out);
        walk(node.right(), out);
    }
    let mut out = Vec::new();
    walk(tree.root(), &mut out);
    out
}

fn in_order<T: Copy>(tree: &RBTree<T>) -> Vec<T> {
    let mut out = Vec::new();
    let _ = tree.for_each(|&v| {
        out.push(v);
        ControlFlow::<()>::Continue(())
    });
    out
}


#[test]
fn random_inserts_stay_valid() {
    let mut rng = XorShift(0x12345678_9abcdef0);
    let mut tree = RBTree::new();
    let mut model = BTreeSet::new();

    for _ in 0..2000 {
        let key = rng.next() % 1000;
        match tree.insert(key) {
            Ok(()) => assert!(model.insert(key)),
            Err(err) => {
                assert_eq!(err.kind(), RBTreeError::DuplicateKey);
                assert!(model.contains(&key));
            }
        }
        tree.validate().unwrap();
        assert_eq!(tree.len(), model.len());
    }

    assert_eq!(in_order(&tree), model.iter().copied().collect::<Vec<_>>());
    assert!(tree.iter().eq(model.iter()));
}

#[test]
fn rejected_operations_change_nothing() {
    let mut tree: RBTree<i32> = (0..100).map(|i| i * 2).collect();
    let before = snapshot(&tree);

    for key in [0, 50, 198] {
        let err = tree.insert(key).unwrap_err();
        assert_eq!(err.into_inner(), key);
    }
    for key in [-1, 1, 99, 199] {
        assert_eq!(tree.delete(&key), Err(RBTreeError::KeyNotFound));
        assert_eq!(tree.take(&key), None);
    }

    assert_eq!(snapshot(&tree), before);
    assert_eq!(tree.len(), 100);
}

#[test]
fn insert_then_delete_everything() {
    const N: u32 = 1000;
    let forward: Vec<u32> = (0..N).collect();
    let reverse: Vec<u32> = (0..N).rev().collect();
    let mut shuffled = forward.clone();
    XorShift(0xdeadbeef).shuffle(&mut shuffled);

    for insert_order in [&forward, &reverse, &shuffled] {
        for delete_order in [&forward, &reverse, &shuffled] {
            let mut tree = RBTree::new();
            for &key in insert_order {
                tree.insert(key).unwrap();
            }
            tree.validate().unwrap();

            for (i, key) in delete_order.iter().enumerate() {
                tree.delete(key).unwrap();
                assert!(!tree.contains(key));
                assert_eq!(tree.len(), N as usize - i - 1);
                if i % 7 == 0 {
                    tree.validate().unwrap();
                }
            }
            assert!(tree.is_empty());
            assert!(tree.root().is_none());
        }
    }
}

#[test]
fn interleaved_inserts_and_deletes() {
    let mut rng = XorShift(42);
    let mut tree = RBTree::new();
    let mut model = BTreeSet::new();

    for _ in 0..5000 {
        let key = rng.next() % 300;
        if rng.next() % 3 == 0 {
            assert_eq!(tree.delete(&key).is_ok(), model.remove(&key));
        } else {
            assert_eq!(tree.insert(key).is_ok(), model.insert(key));
        }
        tree.validate().unwrap();
    }
    assert!(tree.iter().eq(model.iter()));
    assert_eq!(tree.first(), model.first());
    assert_eq!(tree.last(), model.last());
}

#[test]
fn for_each_visits_a_prefix() {
    let tree: RBTree<i32> = (1..=20).collect();

    for k in 1..=20 {
        let mut seen = Vec::new();
        let flow = tree.for_each(|&v| {
            seen.push(v);
            if seen.len() == k { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        assert!(flow.is_break());
        assert_eq!(seen, (1..=k as i32).collect::<Vec<_>>());
    }

    assert_eq!(in_order(&tree), (1..=20).collect::<Vec<_>>());
    assert!(RBTree::<i32>::new().for_each(|_| ControlFlow::Break(())).is_continue());
}

#[test]
fn ascending_inserts_rotate_at_the_root() {
    let mut tree = RBTree::new();
    for k in [10, 20, 30] {
        tree.insert(k).unwrap();
    }

    let root = tree.root().unwrap();
    assert_eq!((*root.value(), root.color()), (20, Color::Black));
    assert!(root.parent().is_none());

    let left = root.left().unwrap();
    let right = root.right().unwrap();
    assert_eq!((*left.value(), left.color()), (10, Color::Red));
    assert_eq!((*right.value(), right.color()), (30, Color::Red));
    assert_eq!(*left.parent().unwrap().value(), 20);
}

#[test]
fn delete_inner_node_then_leaf() {
    let mut tree = RBTree::new();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert(k).unwrap();
    }

    tree.delete(&3).unwrap();
    tree.validate().unwrap();
    tree.delete(&1).unwrap();
    tree.validate().unwrap();

    assert_eq!(in_order(&tree), [4, 5, 7, 8, 9]);
    assert!(validator::root_is_black(&tree));
    assert!(validator::black_height_consistent(&tree));
}

#[test]
fn disposer_sees_each_payload_once() {
    let disposed = Rc::new(RefCell::new(Vec::new()));
    let sink = disposed.clone();
    let mut tree = RBTree::with_parts(NaturalOrder, move |s: String| sink.borrow_mut().push(s));

    for word in ["delta", "alpha", "echo", "bravo", "charlie"] {
        tree.insert(word.to_string()).unwrap();
    }
    // the rejected duplicate comes back to us, and isn't disposed of
    assert_eq!(tree.insert("alpha".to_string()).unwrap_err().into_inner(), "alpha");

    tree.delete(&"bravo".to_string()).unwrap();
    assert_eq!(*disposed.borrow(), ["bravo"]);

    assert_eq!(tree.take(&"echo".to_string()).as_deref(), Some("echo"));
    assert_eq!(disposed.borrow().len(), 1);

    tree.release();
    assert!(tree.is_empty());
    tree.release();

    let mut all = disposed.borrow().clone();
    all.sort();
    assert_eq!(all, ["alpha", "bravo", "charlie", "delta"]);
}

#[test]
fn dropping_the_tree_disposes_everything() {
    static NUM_DISPOSED: AtomicUsize = AtomicUsize::new(0);
    fn count(_: u64) {
        NUM_DISPOSED.fetch_add(1, Ordering::Relaxed);
    }

    {
        let mut tree = RBTree::with_parts(NaturalOrder, count as fn(u64));
        tree.extend(0..300);
        tree.delete(&0).unwrap();
        assert_eq!(NUM_DISPOSED.load(Ordering::Relaxed), 1);
    }
    assert_eq!(NUM_DISPOSED.load(Ordering::Relaxed), 300);
}

#[test]
fn words_tree() {
    let mut tree = RBTree::with_comparator(string_compare::<String>);
    for word in "the quick brown fox jumps over the lazy dog".split(' ') {
        let _ = tree.insert(word.to_string());
    }
    assert_eq!(tree.len(), 8);
    tree.validate().unwrap();
    assert_eq!(concatenate_all(&tree), "brown\ndog\nfox\njumps\nlazy\nover\nquick\nthe\n");
}

#[test]
fn shared_behind_a_lock() {
    let tree = Arc::new(Mutex::new(RBTree::<u64>::new()));

    let handles: Vec<_> = (0..4u64).map(|t| {
        let tree = tree.clone();
        std::thread::spawn(move || {
            for i in 0..250 {
                tree.lock().unwrap().insert(i * 4 + t).unwrap();
            }
        })
    }).collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let tree = tree.lock().unwrap();
    tree.validate().unwrap();
    assert!(tree.iter().copied().eq(0..1000));
}

pub mod rbtree;

// things to put in a tree
pub mod payloads;

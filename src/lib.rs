//! A Binary Search Tree over unique keys that is balanced by rebuilding
//! rather than by rotating.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! owns up to two child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined
//! as the longest path from the root `Node` to a leaf `Node`). Building a tree
//! from a sorted run of keys by always picking the middle key as the subtree
//! root limits the height to `O(lg N)`.
//!
//! ## Balancing by rebuild
//!
//! The [`tree::Tree`] in this crate does _not_ rebalance itself as keys are
//! inserted and deleted. Its shape is only guaranteed to be balanced right
//! after it is built or after an explicit call to
//! [`rebalance`][tree::Tree::rebalance], which throws away every node and
//! builds a fresh minimal-height tree from the sorted keys.
//!
//! ```
//! use bst_rebuild::tree::Tree;
//!
//! let mut tree = Tree::from_keys([5, 1, 4, 1, 3]);
//! assert_eq!(tree.inorder(), vec![1, 3, 4, 5]);
//! assert!(tree.is_balanced());
//!
//! for key in 6..10 {
//!     tree.insert(key);
//! }
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//! assert!(tree.is_balanced());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod tree;
mod util;

//! A BST that only balances when asked to. Keys are unique: inserting a key
//! that's already present does nothing. The tree is built balanced from a
//! batch of keys, drifts out of shape as keys are inserted and deleted, and is
//! rebuilt from scratch by [`Tree::rebalance`].
//!
//! Nodes own their children and nothing else. There are no parent pointers;
//! [`Tree::parent`] and [`Tree::depth`] find their answers by walking down from
//! the root again.
//!
//! # Examples
//!
//! ```
//! use bst_rebuild::tree::Tree;
//!
//! // Duplicates are dropped and the keys are sorted before building.
//! let mut tree = Tree::from_keys([1, 7, 4, 23, 8, 9, 4, 3, 5, 7, 9, 67, 6345, 324]);
//! assert_eq!(tree.inorder(), vec![1, 3, 4, 5, 7, 8, 9, 23, 67, 324, 6345]);
//!
//! // The root is the (lower) middle of the sorted keys.
//! assert_eq!(tree.level_order()[0], 8);
//! assert!(tree.is_balanced());
//!
//! // Inserting keeps the search order but not the shape.
//! tree.insert(7000);
//! tree.insert(8000);
//! tree.insert(9000);
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//! assert!(tree.is_balanced());
//!
//! // Deleting a missing key is not an error.
//! tree.delete(&42);
//! tree.delete(&8);
//! assert!(tree.find(&8).is_none());
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::ptr;

use log::{debug, trace};

use crate::error::TreeError;
use crate::util::DepthFirst;

type Link<K> = Option<Box<Node<K>>>;

/// A Binary Search Tree of unique keys. This can be used for inserting,
/// finding, and deleting keys. It is balanced after it's built and after
/// [`rebalance`][Tree::rebalance] but not in between.
///
/// Cloning and dropping walk the tree with an explicit stack. The traversals,
/// heights and `Debug` recurse once per level, so a tree grown into a very long
/// chain should be [rebalanced][Tree::rebalance] before using them.
#[derive(Debug)]
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    // Dropping a `Box<Node>` recurses into its children. A tree that has been
    // fed ascending keys is a linked list, so take the nodes apart here instead.
    fn drop(&mut self) {
        let mut nodes: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = nodes.pop() {
            nodes.extend(node.left.take());
            nodes.extend(node.right.take());
        }
    }
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    // Copies bottom-up: a node is rebuilt once copies of its children are on
    // `built`, right child on top.
    fn clone(&self) -> Self {
        enum Step<'a, K> {
            Visit(&'a Node<K>),
            Build(&'a Node<K>),
        }

        let mut steps: Vec<Step<'_, K>> = self.root().map(Step::Visit).into_iter().collect();
        let mut built: Vec<Box<Node<K>>> = Vec::with_capacity(self.len);
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => {
                    steps.push(Step::Build(node));
                    steps.extend(node.right().map(Step::Visit));
                    steps.extend(node.left().map(Step::Visit));
                }
                Step::Build(node) => {
                    let right = if node.right.is_some() { built.pop() } else { None };
                    let left = if node.left.is_some() { built.pop() } else { None };
                    built.push(Box::new(Node {
                        key: node.key.clone(),
                        left,
                        right,
                    }));
                }
            }
        }

        Self {
            root: built.pop(),
            len: self.len,
        }
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Builds a balanced tree out of `keys`. The keys don't need to be sorted
    /// and repeated keys are only stored once.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_rebuild::tree::Tree;
    ///
    /// let tree = Tree::from_keys([3, 1, 2, 3, 1]);
    ///
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.root().map(|n| *n.key()), Some(2));
    /// ```
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Ord + Clone,
    {
        let mut keys: Vec<K> = keys.into_iter().collect();
        let received = keys.len();
        keys.sort_unstable();
        keys.dedup();

        let tree = Self {
            root: build_tree(&keys),
            len: keys.len(),
        };
        debug!(
            "built tree from {} keys ({} unique) with height {}",
            received,
            tree.len,
            tree.height(tree.root())
        );

        if cfg!(debug_assertions) {
            assert!(tree.is_balanced());
        }
        tree
    }

    /// The root node, if the tree has any nodes.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// How many keys are stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds the node holding the given key. If no node has the key, `None`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_rebuild::tree::Tree;
    ///
    /// let tree = Tree::from_keys([1, 2, 3]);
    ///
    /// assert_eq!(tree.find(&3).map(|n| *n.key()), Some(3));
    /// assert!(tree.find(&42).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }

        None
    }

    /// Whether a node in the tree holds the given key.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find(key).is_some()
    }

    /// Inserts the given key as a new leaf. If the key is already in the tree
    /// nothing changes. The tree is not rebalanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_rebuild::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// tree.insert(2);
    ///
    /// assert_eq!(tree.inorder(), vec![1, 2]);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Equal => {
                    trace!("insert ignored: key already present");
                    return;
                }
                Ordering::Greater => &mut node.right,
            };
        }

        *link = Some(Node::new_boxed(key));
        self.len += 1;
    }

    /// Deletes the node containing the given key from the tree. If the tree
    /// does not contain a node with the key, nothing happens.
    ///
    /// A node with two children isn't unlinked itself. It takes the key of its
    /// in-order successor (the smallest key in its right subtree) and the
    /// successor's node is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_rebuild::tree::Tree;
    ///
    /// let mut tree = Tree::from_keys([1, 2, 3]);
    /// tree.delete(&2);
    /// tree.delete(&42);
    ///
    /// assert_eq!(tree.inorder(), vec![1, 3]);
    /// assert_eq!(tree.root().map(|n| *n.key()), Some(3));
    /// ```
    pub fn delete(&mut self, key: &K)
    where
        K: Ord,
    {
        // `link` is the parent's slot (left or right) holding the current node,
        // or the root slot.
        let mut link = &mut self.root;
        while link.as_ref().is_some_and(|node| *key != node.key) {
            if let Some(node) = link {
                link = if *key < node.key {
                    &mut node.left
                } else {
                    &mut node.right
                };
            }
        }

        let Some(mut target) = link.take() else {
            trace!("delete ignored: key not present");
            return;
        };

        *link = match (target.left.take(), target.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                target.left = Some(left);
                target.right = Some(right);
                if let Some(successor) = take_leftmost(&mut target.right) {
                    target.key = successor;
                }
                Some(target)
            }
        };
        self.len -= 1;
    }

    /// Returns the keys in breadth-first order: the root, then every node one
    /// level down from left to right, and so on.
    pub fn level_order(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.level_order_with(|_| {})
    }

    /// Like [`level_order`][Tree::level_order] but also calls `visit` on
    /// every node, in the same order the keys are returned in.
    pub fn level_order_with<F>(&self, mut visit: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&Node<K>),
    {
        let mut keys = Vec::with_capacity(self.len);
        let mut queue: VecDeque<&Node<K>> = self.root().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            visit(node);
            keys.push(node.key.clone());
            queue.extend(node.left());
            queue.extend(node.right());
        }

        keys
    }

    /// Returns the keys in sorted order (left subtree, node, right subtree).
    pub fn inorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inorder_with(|_| {})
    }

    /// Like [`inorder`][Tree::inorder] but also calls `visit` on every node.
    pub fn inorder_with<F>(&self, visit: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&Node<K>),
    {
        self.depth_first(DepthFirst::Inorder, visit)
    }

    /// Returns the keys with every node before its subtrees (node, left subtree,
    /// right subtree).
    pub fn preorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.preorder_with(|_| {})
    }

    /// Like [`preorder`][Tree::preorder] but also calls `visit` on every node.
    pub fn preorder_with<F>(&self, visit: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&Node<K>),
    {
        self.depth_first(DepthFirst::Preorder, visit)
    }

    /// Returns the keys with every node after its subtrees (left subtree, right
    /// subtree, node).
    pub fn postorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.postorder_with(|_| {})
    }

    /// Like [`postorder`][Tree::postorder] but also calls `visit` on every node.
    pub fn postorder_with<F>(&self, visit: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&Node<K>),
    {
        self.depth_first(DepthFirst::Postorder, visit)
    }

    fn depth_first<F>(&self, order: DepthFirst, mut visit: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&Node<K>),
    {
        fn walk<K>(node: Option<&Node<K>>, order: DepthFirst, step: &mut dyn FnMut(&Node<K>)) {
            let Some(node) = node else {
                return;
            };

            if order == DepthFirst::Preorder {
                step(node);
            }
            walk(node.left(), order, step);
            if order == DepthFirst::Inorder {
                step(node);
            }
            walk(node.right(), order, step);
            if order == DepthFirst::Postorder {
                step(node);
            }
        }

        let mut keys = Vec::with_capacity(self.len);
        walk(self.root(), order, &mut |node: &Node<K>| {
            visit(node);
            keys.push(node.key.clone());
        });

        keys
    }

    /// Gets the height of the subtree rooted at `node`. A missing node has a
    /// height of 0 and a leaf has a height of 1.
    pub fn height(&self, node: Option<&Node<K>>) -> usize {
        node.map_or(0, Node::height)
    }

    /// Finds the parent of `node` by searching down from the root. Returns
    /// `None` for the root itself and for nodes that aren't in this tree.
    ///
    /// Nodes are matched by identity, not by key, so a node from another tree
    /// with the same key isn't found.
    pub fn parent(&self, node: &Node<K>) -> Option<&Node<K>>
    where
        K: Ord,
    {
        let mut parent = None;
        let mut current = self.root();
        while let Some(candidate) = current {
            if ptr::eq(candidate, node) {
                return parent;
            }
            parent = Some(candidate);
            current = if node.key < candidate.key {
                candidate.left()
            } else {
                candidate.right()
            };
        }

        None
    }

    /// Counts the edges between `node` and the root, so the root has a depth
    /// of 0.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnreachableNode`] if `node` isn't part of this tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_rebuild::error::TreeError;
    /// use bst_rebuild::tree::Tree;
    ///
    /// let tree = Tree::from_keys([1, 2, 3]);
    /// let other = Tree::from_keys([1, 2, 3]);
    ///
    /// let one = tree.find(&1).unwrap();
    /// assert_eq!(tree.depth(one), Ok(1));
    ///
    /// let other_one = other.find(&1).unwrap();
    /// assert_eq!(tree.depth(other_one), Err(TreeError::UnreachableNode));
    /// ```
    pub fn depth(&self, node: &Node<K>) -> Result<usize, TreeError>
    where
        K: Ord,
    {
        let mut depth = 0;
        let mut current = node;
        while !self.root().is_some_and(|root| ptr::eq(root, current)) {
            current = self.parent(current).ok_or(TreeError::UnreachableNode)?;
            depth += 1;
        }

        Ok(depth)
    }

    /// Whether, at every node, the heights of the left and right subtrees
    /// differ by at most 1. An empty tree is balanced.
    pub fn is_balanced(&self) -> bool {
        /// The height of `node` if its subtree is balanced.
        fn balanced_height<K>(node: Option<&Node<K>>) -> Option<usize> {
            let Some(node) = node else {
                return Some(0);
            };
            let left = balanced_height(node.left())?;
            let right = balanced_height(node.right())?;

            (left.abs_diff(right) <= 1).then(|| left.max(right) + 1)
        }

        balanced_height(self.root()).is_some()
    }

    /// Throws away every node and builds a tree of minimal height from the
    /// same keys.
    pub fn rebalance(&mut self)
    where
        K: Clone,
    {
        let before = self.height(self.root());
        let keys = self.inorder();
        *self = Self {
            root: build_tree(&keys),
            len: keys.len(),
        };
        debug!(
            "rebuilt tree of {} keys, height {} -> {}",
            self.len,
            before,
            self.height(self.root())
        );

        if cfg!(debug_assertions) {
            assert!(self.is_balanced());
        }
    }
}

/// Builds a subtree out of `sorted`, which must be strictly ascending. The
/// middle key becomes the subtree's root (the lower of the two middle keys
/// when there's an even number of them) and the keys on either side of it
/// become its left and right subtrees. The result has the smallest height
/// possible for that many keys. An empty slice builds nothing.
///
/// # Examples
///
/// ```
/// use bst_rebuild::tree::build_tree;
///
/// let root = build_tree(&[1, 2, 3, 4]).unwrap();
///
/// assert_eq!(*root.key(), 2);
/// assert_eq!(root.height(), 3);
/// assert!(build_tree::<i32>(&[]).is_none());
/// ```
pub fn build_tree<K>(sorted: &[K]) -> Option<Box<Node<K>>>
where
    K: Clone,
{
    if sorted.is_empty() {
        return None;
    }

    let mid = (sorted.len() - 1) / 2;
    Some(Box::new(Node {
        key: sorted[mid].clone(),
        left: build_tree(&sorted[..mid]),
        right: build_tree(&sorted[mid + 1..]),
    }))
}

/// Unlinks the leftmost node below `link` and returns its key. The node's
/// right subtree takes its place so nothing else is lost.
fn take_leftmost<K>(mut link: &mut Link<K>) -> Option<K> {
    while link.as_ref().is_some_and(|node| node.left.is_some()) {
        if let Some(node) = link {
            link = &mut node.left;
        }
    }

    let leftmost = link.take()?;
    let Node { key, right, .. } = *leftmost;
    if right.is_some() {
        trace!("successor's right subtree spliced into its parent");
    }
    *link = right;

    Some(key)
}

/// A `Node` holds a key and owns up to two children.
#[derive(Debug)]
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
        })
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The root of this node's left subtree, holding smaller keys.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of this node's right subtree, holding larger keys.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub fn height(&self) -> usize {
        let left_height = self.left().map_or(0, Node::height);
        let right_height = self.right().map_or(0, Node::height);
        left_height.max(right_height) + 1
    }
}

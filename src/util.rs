/// Where a depth-first walk visits a node relative to recursing into its children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DepthFirst {
    /// Visit the node, then its left subtree, then its right subtree.
    Preorder,
    /// Visit the left subtree, then the node, then the right subtree.
    Inorder,
    /// Visit both subtrees (left first) before the node.
    Postorder,
}

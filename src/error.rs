//! Errors returned by [`Tree`][crate::tree::Tree] operations.
//!
//! Most misuse of a tree is not an error: looking up a missing key, inserting
//! a key that's already present, or deleting a key that isn't there all leave
//! the tree untouched and report nothing.

/// Errors triggered by tree queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The node handed to a query has no path from this tree's root. It either
    /// belongs to another tree or the tree has no root at all.
    #[error("node is not reachable from the root of this tree")]
    UnreachableNode,
}

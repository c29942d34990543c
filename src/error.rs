use thiserror::Error;

/// A broken red-black invariant found by [`RbTree::verify`](crate::RbTree::verify).
///
/// None of these can be produced by the public insertion and merge operations; they
/// surface only for trees assembled by hand through [`RbTree::node`](crate::RbTree::node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root of a non-empty tree is Red
    #[error("root node is red")]
    RedRoot,
    /// A Red node has a Red child
    #[error("red node has a red child")]
    RedRedViolation,
    /// Two sibling subtrees carry a different number of Black nodes
    #[error("black height mismatch: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Black height of the left subtree
        left: usize,
        /// Black height of the right subtree
        right: usize,
    },
    /// In-order traversal is not strictly ascending
    #[error("values are not strictly ascending in order")]
    OrderViolation,
    /// A node's cached subtree size disagrees with its children
    #[error("cached subtree size {cached} does not match actual size {actual}")]
    SizeMismatch {
        /// Size stored in the node
        cached: usize,
        /// Size recomputed from the children
        actual: usize,
    },
}

/// Failure of a configured parallel build.
#[cfg(feature = "parallel")]
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build ran past its timeout; outstanding sub-builds were cancelled
    #[error("parallel build exceeded its timeout of {timeout:?}")]
    DeadlineExceeded {
        /// The configured timeout
        timeout: core::time::Duration,
    },
    /// The dedicated worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

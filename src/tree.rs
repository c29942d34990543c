use alloc::sync::Arc;
use core::{cmp::Ordering, fmt, marker::PhantomData};

use crate::{Comparator, Natural};

/// Color stored in every node of an [`RbTree`].
///
/// Colors never change on an existing node. Insertion builds a new path whose root may
/// come out Red; the handle returned to callers always has a Black root, so a Red root is
/// only ever seen on trees assembled through [`RbTree::node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// May only hang below a Black node; freshly inserted values start Red
    Red,
    /// Counted by [`RbTree::black_height`], equal along every path
    Black,
}

/// Shared, possibly empty reference to an immutable node.
pub(crate) type Link<T> = Option<Arc<Node<T>>>;

/// An immutable node of the tree.
///
/// Nodes are never mutated after construction; a new version of the tree allocates new
/// nodes along the modified path and shares every other node by reference.
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// Color of this node used for balancing
    pub(crate) color: Color,
    /// Subtree of values ordering before `value`
    pub(crate) left: Link<T>,
    /// The stored value
    pub(crate) value: T,
    /// Subtree of values ordering after `value`
    pub(crate) right: Link<T>,
    /// Total count of values in this node's subtree, including itself
    pub(crate) size: usize,
}

impl<T> Node<T> {
    /// Allocates a new node and returns a link to it
    #[inline]
    pub(crate) fn link(color: Color, left: Link<T>, value: T, right: Link<T>) -> Link<T> {
        let size = 1 + size(&left) + size(&right);
        Some(Arc::new(Node {
            color,
            left,
            value,
            right,
            size,
        }))
    }

    /// Rebuilds this node with a different color, sharing both children
    #[inline]
    pub(crate) fn paint(&self, color: Color) -> Link<T>
    where
        T: Clone,
    {
        Node::link(color, self.left.clone(), self.value.clone(), self.right.clone())
    }
}

#[inline]
pub(crate) fn size<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Returns the node behind `link` if it exists and is Red.
#[inline]
pub(crate) fn red<T>(link: &Link<T>) -> Option<&Node<T>> {
    link.as_deref().filter(|node| node.color == Color::Red)
}

/// A persistent, structurally-shared Red-Black tree holding a set of values.
///
/// Every operation that "modifies" the tree returns a new tree and leaves the receiver
/// untouched, so any number of versions can be kept alive at once. Versions share all
/// nodes that were not on an insertion path, and cloning a tree handle is O(1).
///
/// Values are ordered by the type-level policy `O` (see [`Comparator`]); values that
/// compare equal are kept only once.
///
/// Key features:
/// - O(log n) insertion via path copying
/// - In-order traversal producing the strictly ascending value sequence
/// - Bulk construction by fold, by balanced rebuild and by fork-join
/// - Trees are `Send + Sync` whenever `T` is, and can be branched from concurrently
///
/// ```
/// # use persistent_rbtree::RbTree;
/// let v1 = RbTree::new().insert(2).insert(1);
/// let v2 = v1.insert(3);
///
/// assert_eq!(v1.to_vec(), vec![1, 2]);
/// assert_eq!(v2.to_vec(), vec![1, 2, 3]);
/// ```
pub struct RbTree<T, O = Natural> {
    /// Root node, `None` for the empty tree
    pub(crate) root: Link<T>,
    _order: PhantomData<O>,
}

impl<T> RbTree<T> {
    /// Creates an empty tree ordered by [`Natural`]
    ///
    /// Use [`RbTree::default`] to pick another ordering policy.
    #[inline]
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<T, O> RbTree<T, O> {
    /// Creates an empty tree for any ordering policy
    #[inline]
    pub const fn empty() -> Self {
        Self {
            root: None,
            _order: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn from_link(root: Link<T>) -> Self {
        Self {
            root,
            _order: PhantomData,
        }
    }

    /// Constructs a tree with the given root color, subtrees and root value.
    ///
    /// No balancing is performed: the result is exactly `Node(color, left, value, right)`.
    ///
    /// # Panics
    ///
    /// Panics if the root of `left` does not order before `value`, or the root of `right`
    /// does not order after it.
    pub fn node(color: Color, left: Self, value: T, right: Self) -> Self
    where
        O: Comparator<T>,
    {
        assert!(
            left.root().is_none_or(|l| O::less(l, &value)),
            "left subtree root must order before the node value"
        );
        assert!(
            right.root().is_none_or(|r| O::less(&value, r)),
            "right subtree root must order after the node value"
        );
        Self::from_link(Node::link(color, left.root, value, right.root))
    }

    /// Returns `true` if this is the empty tree
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree
    #[inline]
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Returns the root value, or `None` for the empty tree
    #[inline]
    pub fn root(&self) -> Option<&T> {
        self.root.as_deref().map(|node| &node.value)
    }

    fn root_node(&self, accessor: &str) -> &Node<T> {
        match self.root.as_deref() {
            Some(node) => node,
            None => panic!("precondition violation: {accessor}() called on an empty tree"),
        }
    }

    /// Returns the color of the root
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty.
    #[inline]
    pub fn color(&self) -> Color {
        self.root_node("color").color
    }

    /// Returns the root value
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty.
    #[inline]
    pub fn value(&self) -> &T {
        &self.root_node("value").value
    }

    /// Returns the left subtree of the root
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty.
    #[inline]
    pub fn left(&self) -> Self {
        Self::from_link(self.root_node("left").left.clone())
    }

    /// Returns the right subtree of the root
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty.
    #[inline]
    pub fn right(&self) -> Self {
        Self::from_link(self.root_node("right").right.clone())
    }

    /// Returns `true` if the root is Red and its left child is Red
    #[inline]
    pub fn is_doubled_left(&self) -> bool {
        red(&self.root).is_some_and(|node| red(&node.left).is_some())
    }

    /// Returns `true` if the root is Red and its right child is Red
    #[inline]
    pub fn is_doubled_right(&self) -> bool {
        red(&self.root).is_some_and(|node| red(&node.right).is_some())
    }

    /// Returns `true` if both trees share the same root node (or are both empty).
    ///
    /// Identity implies equality; it is how structural sharing between versions is
    /// observed.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns `true` if both trees have the same shape, colors and values.
    ///
    /// Stricter than `==`, which only compares the in-order value sequences.
    pub fn structurally_eq(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        fn go<T: PartialEq>(a: &Link<T>, b: &Link<T>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
                (Some(a), Some(b)) => {
                    a.color == b.color
                        && a.value == b.value
                        && go(&a.left, &b.left)
                        && go(&a.right, &b.right)
                }
                _ => false,
            }
        }
        go(&self.root, &other.root)
    }

    /// Returns `true` if the tree holds a value comparing equal to `value`
    pub fn contains(&self, value: &T) -> bool
    where
        O: Comparator<T>,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match O::compare(value, &node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Returns the smallest value, or `None` if the tree is empty
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Returns the largest value, or `None` if the tree is empty
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }
}

impl<T, O> Clone for RbTree<T, O> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_link(self.root.clone())
    }
}

impl<T, O> Default for RbTree<T, O> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, O> fmt::Debug for RbTree<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, O> PartialEq for RbTree<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, O> Eq for RbTree<T, O> {}

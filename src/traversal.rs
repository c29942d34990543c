use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{
    RbTree,
    tree::{Link, Node, size},
};

/// Visits every value of `tree` in ascending order.
///
/// The left subtree is visited fully, then the node value, then the right subtree.
/// Visiting the empty tree never calls `visit`.
///
/// # Arguments
///
/// * `tree` - The tree to traverse
/// * `visit` - Called once per value
pub fn for_each<'a, T, O, F>(tree: &'a RbTree<T, O>, mut visit: F)
where
    F: FnMut(&'a T),
{
    fn walk<'a, T, F: FnMut(&'a T)>(link: &'a Link<T>, visit: &mut F) {
        if let Some(node) = link.as_deref() {
            walk(&node.left, visit);
            visit(&node.value);
            walk(&node.right, visit);
        }
    }
    walk(&tree.root, &mut visit);
}

/// Lazy in-order iterator over the values of a [`RbTree`].
///
/// Holds the path of pending ancestors, so it uses O(log n) memory and never copies
/// values. Since trees are immutable the iteration can be restarted at any time by
/// calling [`RbTree::iter`] again.
pub struct Iter<'a, T> {
    /// Nodes whose value and right subtree are yet to be yielded
    stack: Vec<&'a Node<T>>,
    /// Number of values left to yield
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: &'a Link<T>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: size(root),
        };
        iter.descend_left(root.as_deref());
        iter
    }

    fn descend_left(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T, O> RbTree<T, O> {
    /// Visits every value in ascending order, see [`for_each`]
    #[inline]
    pub fn for_each<'a, F: FnMut(&'a T)>(&'a self, visit: F) {
        for_each(self, visit)
    }

    /// Returns a lazy iterator over the values in ascending order
    ///
    /// ```
    /// # use persistent_rbtree::RbTree;
    /// let tree = RbTree::new().insert_many([3, 1, 2]);
    /// let mut iter = tree.iter();
    ///
    /// assert_eq!(iter.len(), 3);
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Collects the values in ascending order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|value| values.push(value.clone()));
        values
    }
}

impl<'a, T, O> IntoIterator for &'a RbTree<T, O> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

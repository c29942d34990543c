use alloc::vec::Vec;
use core::cmp::Ordering;

use log::debug;

use crate::{
    Comparator, RbTree,
    insert::blacken,
    tree::{Color, Link, Node},
};

/// How [`merge_trees_with`] combines two trees.
///
/// Both strategies produce the same set of values and keep the value from the first
/// tree when two values compare equal. They differ in cost and in the shape of the
/// result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Insert every value of the second tree into the first, one at a time.
    ///
    /// O(m log(n + m)); shares most of the first tree's nodes with the result.
    FoldInsert,
    /// Merge both in-order sequences and rebuild a balanced tree from the result.
    ///
    /// O(n + m); allocates a fresh tree of minimal height.
    #[default]
    SortedRebuild,
}

/// Merges two trees with the default [`MergeStrategy::SortedRebuild`] strategy.
///
/// # Arguments
///
/// * `first` - Tree whose values win on equal keys
/// * `second` - Tree to merge into `first`
///
/// # Returns
///
/// * `RbTree<T, O>` - A tree holding the union of both trees
///
/// # Examples
///
/// ```
/// # use persistent_rbtree::{RbTree, merge_trees};
/// let a = RbTree::new().insert_many(["apple", "banana"]);
/// let b = RbTree::new().insert_many(["cherry", "date"]);
///
/// let merged = merge_trees(&a, &b);
/// assert_eq!(merged.to_vec(), vec!["apple", "banana", "cherry", "date"]);
/// ```
pub fn merge_trees<T, O>(first: &RbTree<T, O>, second: &RbTree<T, O>) -> RbTree<T, O>
where
    T: Clone,
    O: Comparator<T>,
{
    merge_trees_with(first, second, MergeStrategy::default())
}

/// Merges two trees with an explicit strategy.
///
/// The result always satisfies every red-black invariant and has a Black root. Neither
/// input is modified.
pub fn merge_trees_with<T, O>(
    first: &RbTree<T, O>,
    second: &RbTree<T, O>,
    strategy: MergeStrategy,
) -> RbTree<T, O>
where
    T: Clone,
    O: Comparator<T>,
{
    if second.is_empty() {
        return RbTree::from_link(blacken(first.root.clone()));
    }
    if first.is_empty() {
        return RbTree::from_link(blacken(second.root.clone()));
    }

    match strategy {
        MergeStrategy::FoldInsert => first.insert_many(second.iter().cloned()),
        MergeStrategy::SortedRebuild => sorted_rebuild(first, second),
    }
}

fn sorted_rebuild<T, O>(first: &RbTree<T, O>, second: &RbTree<T, O>) -> RbTree<T, O>
where
    T: Clone,
    O: Comparator<T>,
{
    let xs: Vec<&T> = first.iter().collect();
    let ys: Vec<&T> = second.iter().collect();
    let mut merged = Vec::with_capacity(xs.len() + ys.len());

    let (mut i, mut j) = (0, 0);
    while i < xs.len() && j < ys.len() {
        match O::compare(xs[i], ys[j]) {
            Ordering::Less => {
                merged.push(T::clone(xs[i]));
                i += 1;
            }
            Ordering::Greater => {
                merged.push(T::clone(ys[j]));
                j += 1;
            }
            Ordering::Equal => {
                merged.push(T::clone(xs[i]));
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend(xs[i..].iter().map(|x| T::clone(x)));
    merged.extend(ys[j..].iter().map(|y| T::clone(y)));

    debug!(
        "sorted merge of {} and {} values rebuilt {} values",
        xs.len(),
        ys.len(),
        merged.len()
    );
    RbTree::from_link(build_balanced(&merged))
}

/// Builds a minimal-height tree from strictly ascending values by midpoint split.
///
/// Midpoint splits fill every level except the deepest one. Nodes on that partial level
/// are Red and every other node is Black, which gives all paths the same black height.
pub(crate) fn build_balanced<T: Clone>(sorted: &[T]) -> Link<T> {
    let red_depth = (sorted.len() + 1).ilog2() as usize;
    build_level(sorted, 0, red_depth)
}

fn build_level<T: Clone>(values: &[T], depth: usize, red_depth: usize) -> Link<T> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    let color = if depth == red_depth {
        Color::Red
    } else {
        Color::Black
    };
    Node::link(
        color,
        build_level(&values[..mid], depth + 1, red_depth),
        values[mid].clone(),
        build_level(&values[mid + 1..], depth + 1, red_depth),
    )
}

impl<T: Clone + Ord> RbTree<T> {
    /// Builds a balanced [`Natural`](crate::Natural)-ordered tree from strictly ascending
    /// values, see [`RbTree::from_ascending`]
    ///
    /// ```
    /// # use persistent_rbtree::RbTree;
    /// let tree = RbTree::from_sorted(&[1, 2, 3, 4, 5, 6]);
    /// assert_eq!(tree.len(), 6);
    /// assert!(tree.verify().is_ok());
    /// ```
    #[inline]
    pub fn from_sorted(values: &[T]) -> Self {
        Self::from_ascending(values)
    }
}

impl<T: Clone, O: Comparator<T>> RbTree<T, O> {
    /// Builds a balanced tree from values that are already strictly ascending under `O`.
    ///
    /// Runs in O(n), against O(n log n) for inserting the values one by one.
    ///
    /// # Arguments
    ///
    /// * `values` - Strictly ascending values under the policy `O`
    ///
    /// # Panics
    ///
    /// Panics if `values` is not strictly ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::{Natural, RbTree, Reverse};
    /// let tree = RbTree::<_, Reverse<Natural>>::from_ascending(&[9, 7, 5, 3]);
    /// assert_eq!(tree.to_vec(), vec![9, 7, 5, 3]);
    /// assert!(tree.verify().is_ok());
    /// ```
    pub fn from_ascending(values: &[T]) -> Self {
        assert!(
            values.windows(2).all(|w| O::less(&w[0], &w[1])),
            "values must be strictly ascending"
        );
        Self::from_link(build_balanced(values))
    }

    /// Merges `other` into `self`, see [`merge_trees_with`]
    #[inline]
    pub fn merge(&self, other: &Self, strategy: MergeStrategy) -> Self {
        merge_trees_with(self, other, strategy)
    }
}

use core::cmp::Ordering;

use crate::{
    Comparator, RbTree,
    balance::balance,
    tree::{Color, Link, Node, red},
};

/// Inserts `value` below `link`, returning `None` if an equal value is already present.
///
/// The returned subtree may have a Red root with a Red child; the caller one level up
/// resolves that through [`balance`].
fn ins<T: Clone, O: Comparator<T>>(link: &Link<T>, value: T) -> Option<Link<T>> {
    let Some(node) = link.as_deref() else {
        return Some(Node::link(Color::Red, None, value, None));
    };

    match O::compare(&value, &node.value) {
        Ordering::Less => {
            let left = ins::<T, O>(&node.left, value)?;
            Some(balance(node.color, left, node.value.clone(), node.right.clone()))
        }
        Ordering::Greater => {
            let right = ins::<T, O>(&node.right, value)?;
            Some(balance(node.color, node.left.clone(), node.value.clone(), right))
        }
        Ordering::Equal => None,
    }
}

/// Forces the root Black, reusing the node when it already is.
pub(crate) fn blacken<T: Clone>(link: Link<T>) -> Link<T> {
    if let Some(node) = red(&link) {
        return node.paint(Color::Black);
    }
    link
}

impl<T: Clone, O: Comparator<T>> RbTree<T, O> {
    /// Returns a new tree containing every value of `self` plus `value`.
    ///
    /// Only the nodes on the path from the root to the insertion point are copied; all
    /// other nodes are shared with `self`, which remains valid and unchanged. The root of
    /// the result is always Black.
    ///
    /// Inserting a value that is already present is not an error: the result holds the
    /// same values and, when the root of `self` is Black, is `self` itself (no allocation).
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `Self` - The new version of the tree
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::{Color, RbTree};
    /// let tree = [20, 15, 25, 10, 5]
    ///     .into_iter()
    ///     .fold(RbTree::new(), |tree, v| tree.insert(v));
    ///
    /// assert_eq!(*tree.value(), 15);
    /// assert_eq!(tree.color(), Color::Black);
    ///
    /// let again = tree.insert(10);
    /// assert!(again.ptr_eq(&tree));
    /// ```
    pub fn insert(&self, value: T) -> Self {
        match ins::<T, O>(&self.root, value) {
            Some(root) => Self::from_link(blacken(root)),
            None => Self::from_link(blacken(self.root.clone())),
        }
    }

    /// Inserts every value of `values`, in encounter order, by folding [`RbTree::insert`].
    ///
    /// # Arguments
    ///
    /// * `values` - The values to insert
    ///
    /// # Returns
    ///
    /// * `Self` - A tree holding the union of `self` and `values`
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::RbTree;
    /// let tree = RbTree::new().insert_many(["pear", "apple", "fig", "apple"]);
    /// assert_eq!(tree.to_vec(), vec!["apple", "fig", "pear"]);
    /// ```
    pub fn insert_many<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .fold(self.clone(), |tree, value| tree.insert(value))
    }
}

impl<T: Clone, O: Comparator<T>> FromIterator<T> for RbTree<T, O> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::empty().insert_many(iter)
    }
}

impl<T: Clone, O: Comparator<T>> Extend<T> for RbTree<T, O> {
    /// Replaces this handle with a tree holding the inserted values.
    ///
    /// Other handles to the previous version are unaffected.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        *self = self.insert_many(iter);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        string::{String, ToString},
        vec::Vec,
    };

    use proptest::prelude::*;

    use super::*;
    use crate::{FloatTotal, Natural, Reverse};

    fn sorted_unique(values: &[i32]) -> Vec<i32> {
        let mut expected = values.to_vec();
        expected.sort_unstable();
        expected.dedup();
        expected
    }

    #[test]
    fn test_insert_into_empty() {
        let tree = RbTree::new().insert(10);

        assert_eq!(*tree.value(), 10);
        assert_eq!(tree.color(), Color::Black);
        assert!(tree.left().is_empty());
        assert!(tree.right().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_rebalance_trace() {
        let tree = RbTree::new().insert_many([20, 15, 25, 10, 5]);

        assert_eq!(*tree.value(), 15);
        assert_eq!(tree.color(), Color::Black);
        assert_eq!(*tree.left().value(), 10);
        assert_eq!(*tree.right().value(), 20);
        assert_eq!(*tree.left().left().value(), 5);
        assert_eq!(tree.left().left().color(), Color::Red);
        assert_eq!(*tree.right().right().value(), 25);
        assert_eq!(tree.right().right().color(), Color::Red);
        assert_eq!(tree.to_vec(), vec![5, 10, 15, 20, 25]);
        assert_eq!(tree.verify(), Ok(2));
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let once = RbTree::new().insert(10);
        let twice = once.insert(10);

        assert!(twice.ptr_eq(&once));
        assert!(twice.structurally_eq(&RbTree::new().insert(10)));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_blackens_red_root() {
        let red_root = RbTree::node(Color::Red, RbTree::new(), 7, RbTree::new());
        let tree = red_root.insert(7);

        assert_eq!(tree.color(), Color::Black);
        assert_eq!(tree.to_vec(), vec![7]);
        assert_eq!(red_root.color(), Color::Red);
    }

    #[test]
    fn test_previous_versions_unchanged() {
        let v1 = RbTree::new().insert_many([4, 2, 6]);
        let v2 = v1.insert(5);
        let v3 = v1.insert(1);

        assert_eq!(v1.to_vec(), vec![2, 4, 6]);
        assert_eq!(v2.to_vec(), vec![2, 4, 5, 6]);
        assert_eq!(v3.to_vec(), vec![1, 2, 4, 6]);
        assert_eq!(v1.verify(), Ok(1));
    }

    #[test]
    fn test_off_path_subtrees_are_shared() {
        let base = RbTree::new().insert_many(1..=15);
        let next = base.insert(100);

        // 100 goes right of the root, the left subtree is reused as is
        assert!(next.left().ptr_eq(&base.left()));
        assert!(!next.right().ptr_eq(&base.right()));
    }

    #[test]
    fn test_sequential_orders_stay_balanced() {
        let ascending = RbTree::new().insert_many(0..1000);
        let descending = RbTree::new().insert_many((0..1000).rev());

        for tree in [&ascending, &descending] {
            assert_eq!(tree.len(), 1000);
            assert_eq!(tree.min(), Some(&0));
            assert_eq!(tree.max(), Some(&999));
            let black_height = tree.verify().unwrap();
            // height is bounded by 2 * black height
            assert!(black_height <= 10);
        }
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_string_values() {
        let words = ["the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"];
        let tree: RbTree<String> = words.iter().map(|w| w.to_string()).collect();

        assert_eq!(
            tree.to_vec(),
            vec!["brown", "dog", "fox", "jumps", "lazy", "over", "quick", "the"]
        );
        assert!(tree.contains(&"fox".to_string()));
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn test_extend_replaces_handle_only() {
        let original = RbTree::new().insert_many([1, 2]);
        let mut tree = original.clone();
        tree.extend([3, 4]);

        assert_eq!(tree.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(original.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_reverse_policy() {
        let tree = RbTree::<i32, Reverse<Natural>>::empty().insert_many([3, 1, 2, 3]);
        assert_eq!(tree.to_vec(), vec![3, 2, 1]);
        assert_eq!(tree.min(), Some(&3));
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn test_float_policy() {
        let tree = RbTree::<f64, FloatTotal>::empty().insert_many([
            1.5,
            f64::NAN,
            -0.0,
            f64::INFINITY,
            0.0,
            f64::NEG_INFINITY,
            f64::NAN,
        ]);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.min(), Some(&f64::NEG_INFINITY));
        assert!(tree.max().is_some_and(|v| v.is_nan()));
        assert!(tree.contains(&0.0));
        assert!(tree.verify().is_ok());
    }

    proptest! {
        #[test]
        fn prop_insert_keeps_invariants(values in prop::collection::vec(-500i32..500, 0..400)) {
            let tree = RbTree::new().insert_many(values.iter().copied());

            prop_assert!(tree.verify().is_ok());
            prop_assert_eq!(tree.to_vec(), sorted_unique(&values));
            prop_assert_eq!(tree.len(), sorted_unique(&values).len());
        }

        #[test]
        fn prop_insert_is_idempotent(values in prop::collection::vec(any::<i16>(), 0..200), x in any::<i16>()) {
            let tree = RbTree::new().insert_many(values);
            let once = tree.insert(x);
            let twice = once.insert(x);

            prop_assert!(twice.ptr_eq(&once));
            prop_assert_eq!(once.to_vec(), twice.to_vec());
        }

        #[test]
        fn prop_root_is_black(values in prop::collection::vec(any::<u8>(), 1..100)) {
            let mut tree = RbTree::new();
            for v in values {
                tree = tree.insert(v);
                prop_assert_eq!(tree.color(), Color::Black);
            }
        }

        #[test]
        fn prop_contains_matches_input(values in prop::collection::vec(0u16..1000, 0..200), probe in 0u16..1000) {
            let tree = RbTree::new().insert_many(values.iter().copied());
            prop_assert_eq!(tree.contains(&probe), values.contains(&probe));
        }
    }
}

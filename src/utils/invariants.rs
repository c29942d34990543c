use crate::{
    Comparator, InvariantViolation, RbTree,
    tree::{Color, Link, red, size},
};

/// Checks the red-property, black height and cached sizes below `link`.
///
/// Returns the number of Black nodes on every path from `link` to an empty slot.
fn check_subtree<T>(link: &Link<T>) -> Result<usize, InvariantViolation> {
    let Some(node) = link.as_deref() else {
        return Ok(0);
    };

    if node.color == Color::Red && (red(&node.left).is_some() || red(&node.right).is_some()) {
        return Err(InvariantViolation::RedRedViolation);
    }

    let actual = 1 + size(&node.left) + size(&node.right);
    if node.size != actual {
        return Err(InvariantViolation::SizeMismatch {
            cached: node.size,
            actual,
        });
    }

    let left = check_subtree(&node.left)?;
    let right = check_subtree(&node.right)?;
    if left != right {
        return Err(InvariantViolation::BlackHeightMismatch { left, right });
    }

    Ok(left + usize::from(node.color == Color::Black))
}

impl<T, O> RbTree<T, O> {
    /// Returns the black height of the tree after checking the red-property, equal black
    /// height on every path and the cached subtree sizes.
    ///
    /// Unlike [`RbTree::verify`] this does not require a Black root or look at value
    /// order, so it also applies to intermediate subtrees.
    pub fn black_height(&self) -> Result<usize, InvariantViolation> {
        check_subtree(&self.root)
    }

    /// Checks every red-black invariant and returns the black height of the tree.
    ///
    /// Trees produced by insertion, merging and bulk construction always pass; a failure
    /// can only come from a tree assembled by hand with [`RbTree::node`].
    ///
    /// # Returns
    ///
    /// * `Result<usize, InvariantViolation>` - The black height, or the first violation found
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::{Color, InvariantViolation, RbTree};
    /// let valid = RbTree::new().insert_many(1..=7);
    /// assert!(valid.verify().is_ok());
    ///
    /// let red_root = RbTree::node(Color::Red, RbTree::new(), 1, RbTree::new());
    /// assert_eq!(red_root.verify(), Err(InvariantViolation::RedRoot));
    /// ```
    pub fn verify(&self) -> Result<usize, InvariantViolation>
    where
        O: Comparator<T>,
    {
        if red(&self.root).is_some() {
            return Err(InvariantViolation::RedRoot);
        }

        let black_height = check_subtree(&self.root)?;

        let mut values = self.iter();
        if let Some(mut prev) = values.next() {
            for value in values {
                if !O::less(prev, value) {
                    return Err(InvariantViolation::OrderViolation);
                }
                prev = value;
            }
        }

        Ok(black_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(color: Color, value: i32) -> RbTree<i32> {
        RbTree::node(color, RbTree::new(), value, RbTree::new())
    }

    #[test]
    fn test_empty_tree_is_valid() {
        assert_eq!(RbTree::<i32>::new().verify(), Ok(0));
        assert_eq!(RbTree::<i32>::new().black_height(), Ok(0));
    }

    #[test]
    fn test_detects_red_root() {
        let tree = leaf(Color::Red, 1);
        assert_eq!(tree.verify(), Err(InvariantViolation::RedRoot));
        assert_eq!(tree.black_height(), Ok(0));
    }

    #[test]
    fn test_detects_red_red() {
        let tree = RbTree::node(
            Color::Black,
            RbTree::node(Color::Red, leaf(Color::Red, 1), 2, RbTree::new()),
            3,
            leaf(Color::Red, 4),
        );
        assert_eq!(tree.verify(), Err(InvariantViolation::RedRedViolation));
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let tree = RbTree::node(Color::Black, leaf(Color::Black, 1), 2, RbTree::new());
        assert_eq!(
            tree.verify(),
            Err(InvariantViolation::BlackHeightMismatch { left: 1, right: 0 })
        );
    }

    #[test]
    fn test_detects_order_violation() {
        // 5 is right of 3 locally but ends up left of the root 4
        let left = RbTree::node(Color::Black, RbTree::new(), 3, leaf(Color::Red, 5));
        let tree = RbTree::node(Color::Black, left, 4, leaf(Color::Black, 6));
        assert_eq!(tree.verify(), Err(InvariantViolation::OrderViolation));
    }

    #[test]
    fn test_valid_hand_built_tree() {
        let tree = RbTree::node(
            Color::Black,
            leaf(Color::Black, 1),
            2,
            RbTree::node(Color::Red, leaf(Color::Black, 3), 4, leaf(Color::Black, 5)),
        );
        assert_eq!(tree.verify(), Ok(2));
    }
}

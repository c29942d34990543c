use crate::{
    Comparator, RbTree,
    tree::{Color, Link, Node, red},
};

/// Builds `Node(color, left, value, right)`, resolving a red-red violation below a Black
/// parent with a single rotation and recolor.
///
/// The four shapes are checked in a fixed order (left-left, left-right, right-left,
/// right-right); each yields a Red root with two Black children. In-order sequence and
/// black height are preserved. A Red parent always gets the plain construction, the
/// violation is then resolved one level up.
pub(crate) fn balance<T: Clone>(color: Color, left: Link<T>, value: T, right: Link<T>) -> Link<T> {
    if color == Color::Black {
        if let Some(l) = red(&left) {
            if let Some(ll) = red(&l.left) {
                return Node::link(
                    Color::Red,
                    ll.paint(Color::Black),
                    l.value.clone(),
                    Node::link(Color::Black, l.right.clone(), value, right),
                );
            }
            if let Some(lr) = red(&l.right) {
                return Node::link(
                    Color::Red,
                    Node::link(Color::Black, l.left.clone(), l.value.clone(), lr.left.clone()),
                    lr.value.clone(),
                    Node::link(Color::Black, lr.right.clone(), value, right),
                );
            }
        }
        if let Some(r) = red(&right) {
            if let Some(rl) = red(&r.left) {
                return Node::link(
                    Color::Red,
                    Node::link(Color::Black, left, value, rl.left.clone()),
                    rl.value.clone(),
                    Node::link(Color::Black, rl.right.clone(), r.value.clone(), r.right.clone()),
                );
            }
            if let Some(rr) = red(&r.right) {
                return Node::link(
                    Color::Red,
                    Node::link(Color::Black, left, value, r.left.clone()),
                    r.value.clone(),
                    rr.paint(Color::Black),
                );
            }
        }
    }
    Node::link(color, left, value, right)
}

impl<T: Clone, O: Comparator<T>> RbTree<T, O> {
    /// Constructs a node like [`RbTree::node`], rebalancing a doubled-red child when
    /// `color` is Black.
    ///
    /// # Arguments
    ///
    /// * `color` - Color of the node to construct
    /// * `left` - Subtree ordering before `value`
    /// * `value` - The node value
    /// * `right` - Subtree ordering after `value`
    ///
    /// # Returns
    ///
    /// * `Self` - A tree with the same in-order sequence and black height as
    ///   `Node(color, left, value, right)`
    ///
    /// # Panics
    ///
    /// Panics if the subtree roots are not ordered around `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::{Color, RbTree};
    /// let leaf = |v| RbTree::node(Color::Red, RbTree::new(), v, RbTree::new());
    /// let left = RbTree::node(Color::Red, leaf(1), 2, RbTree::new());
    ///
    /// let tree = RbTree::balance(Color::Black, left, 3, RbTree::new());
    /// assert_eq!(*tree.value(), 2);
    /// assert_eq!(tree.color(), Color::Red);
    /// assert_eq!(tree.left().color(), Color::Black);
    /// assert_eq!(tree.right().color(), Color::Black);
    /// ```
    pub fn balance(color: Color, left: Self, value: T, right: Self) -> Self {
        assert!(
            left.root().is_none_or(|l| O::less(l, &value)),
            "left subtree root must order before the node value"
        );
        assert!(
            right.root().is_none_or(|r| O::less(&value, r)),
            "right subtree root must order after the node value"
        );
        Self::from_link(balance(color, left.root, value, right.root))
    }
}

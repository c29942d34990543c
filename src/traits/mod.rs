mod comparator;
pub use comparator::{Comparator, FloatTotal, Natural, Reverse};

#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod traits;
pub use traits::{Comparator, FloatTotal, Natural, Reverse};

mod error;
pub use error::InvariantViolation;
#[cfg(feature = "parallel")]
pub use error::BuildError;

mod tree;
pub use tree::{Color, RbTree};

mod balance;
mod insert;

mod traversal;
pub use traversal::{Iter, for_each};

mod merge;
pub use merge::{MergeStrategy, merge_trees, merge_trees_with};

#[cfg(feature = "parallel")]
mod parallel;
#[cfg(feature = "parallel")]
pub use parallel::{
    CANCEL_CHECK_INTERVAL, DEFAULT_MAX_DEPTH, DEFAULT_THRESHOLD, ParallelConfig, parallel_insert,
};

mod utils;

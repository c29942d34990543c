use core::{
    convert::Infallible,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use std::time::Instant;

use log::{debug, trace, warn};

use crate::{BuildError, Comparator, MergeStrategy, RbTree, merge_trees_with};

/// Sequences shorter than this are inserted sequentially
pub const DEFAULT_THRESHOLD: usize = 1000;

/// Maximum number of nested forks, so at most `2^DEFAULT_MAX_DEPTH` leaf builds
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Number of inserts a leaf build performs between two cancellation checks
pub const CANCEL_CHECK_INTERVAL: usize = 256;

/// Settings of a fork-join build.
///
/// ```
/// # use core::time::Duration;
/// # use persistent_rbtree::{MergeStrategy, ParallelConfig, RbTree};
/// let config = ParallelConfig::new(64)
///     .with_max_depth(4)
///     .with_merge_strategy(MergeStrategy::FoldInsert)
///     .with_timeout(Duration::from_secs(10));
///
/// let values: Vec<u32> = (0..1000).rev().collect();
/// let tree = RbTree::new().parallel_insert_with(&values, &config).unwrap();
/// assert_eq!(tree.len(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParallelConfig {
    /// Sequences shorter than this are not split
    threshold: usize,
    /// Maximum fork nesting
    max_depth: usize,
    /// How the two halves of a fork are combined
    strategy: MergeStrategy,
    /// Budget for the whole build, unbounded if `None`
    timeout: Option<Duration>,
    /// Size of a dedicated worker pool, the global rayon pool if `None`
    num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ParallelConfig {
    /// Creates a configuration with the given split threshold and defaults for the rest
    ///
    /// # Arguments
    ///
    /// * `threshold` - Sequences shorter than this are inserted sequentially
    pub const fn new(threshold: usize) -> Self {
        Self {
            threshold,
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: MergeStrategy::SortedRebuild,
            timeout: None,
            num_threads: None,
        }
    }

    /// Sets the maximum fork nesting; `0` disables forking
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the strategy used to join the two halves of a fork
    pub const fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Bounds the whole build; once exceeded outstanding sub-builds are cancelled
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs the build on a dedicated pool of `num_threads` workers
    pub const fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Returns the split threshold
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the maximum fork nesting
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the merge strategy
    pub const fn merge_strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Returns the timeout, if any
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the dedicated worker count, if any
    pub const fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }
}

/// Decides whether an ongoing build should be abandoned.
///
/// Checked at every fork and between chunks of a leaf build. `Error` is what a cancelled
/// build returns; [`Unbounded`] uses [`Infallible`] so its builds cannot fail.
trait Cancel: Sync {
    type Error: Send;

    fn check(&self) -> Result<(), Self::Error>;
}

/// Build without a time budget.
struct Unbounded;

impl Cancel for Unbounded {
    type Error = Infallible;

    #[inline]
    fn check(&self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Marker returned by every task of a build that ran out of time.
#[derive(Debug, Clone, Copy)]
struct Cancelled;

/// Build that stops once `at` has passed.
struct Deadline {
    at: Instant,
    tripped: AtomicBool,
}

impl Deadline {
    /// Returns `None` when `started + timeout` is not representable, which no build can reach.
    fn after(started: Instant, timeout: Duration) -> Option<Self> {
        Some(Self {
            at: started.checked_add(timeout)?,
            tripped: AtomicBool::new(false),
        })
    }
}

impl Cancel for Deadline {
    type Error = Cancelled;

    fn check(&self) -> Result<(), Cancelled> {
        if self.tripped.load(Ordering::Relaxed) {
            return Err(Cancelled);
        }
        if Instant::now() >= self.at {
            // first task to notice stops its siblings at their next check
            self.tripped.store(true, Ordering::Relaxed);
            return Err(Cancelled);
        }
        Ok(())
    }
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// State shared by every task of one build.
struct ForkJoin<'c, C> {
    config: &'c ParallelConfig,
    cancel: C,
}

impl<'c, C: Cancel> ForkJoin<'c, C> {
    fn new(config: &'c ParallelConfig, cancel: C) -> Self {
        Self { config, cancel }
    }

    /// Builds `base ∪ values`.
    fn build<T, O>(
        &self,
        base: &RbTree<T, O>,
        values: &[T],
        depth: usize,
    ) -> Result<RbTree<T, O>, C::Error>
    where
        T: Clone + Send + Sync,
        O: Comparator<T> + Send + Sync,
    {
        self.cancel.check()?;
        if values.len() < self.config.threshold.max(2) || depth >= self.config.max_depth {
            return self.build_sequential(base, values);
        }

        let (lo, hi) = values.split_at(values.len() / 2);
        trace!("fork at depth {depth}: {} + {} values", lo.len(), hi.len());

        // both halves start from the same base and are joined by a merge
        let (left, right) = rayon::join(
            || self.build(base, lo, depth + 1),
            || self.build(base, hi, depth + 1),
        );
        let (left, right) = (left?, right?);

        trace!(
            "join at depth {depth}: merging {} and {} values",
            left.len(),
            right.len()
        );
        Ok(merge_trees_with(&left, &right, self.config.strategy))
    }

    fn build_sequential<T, O>(
        &self,
        base: &RbTree<T, O>,
        values: &[T],
    ) -> Result<RbTree<T, O>, C::Error>
    where
        T: Clone,
        O: Comparator<T>,
    {
        let mut tree = base.clone();
        for chunk in values.chunks(CANCEL_CHECK_INTERVAL) {
            self.cancel.check()?;
            tree = tree.insert_many(chunk.iter().cloned());
        }
        Ok(tree)
    }
}

/// Builds `tree ∪ values` by fork-join, see [`RbTree::parallel_insert`]
pub fn parallel_insert<T, O>(tree: &RbTree<T, O>, values: &[T], threshold: usize) -> RbTree<T, O>
where
    T: Clone + Send + Sync,
    O: Comparator<T> + Send + Sync,
{
    let config = ParallelConfig::new(threshold);
    debug!(
        "parallel insert of {} values (threshold {threshold})",
        values.len()
    );
    into_ok(ForkJoin::new(&config, Unbounded).build(tree, values, 0))
}

impl<T, O> RbTree<T, O>
where
    T: Clone + Send + Sync,
    O: Comparator<T> + Send + Sync,
{
    /// Inserts `values` by splitting them in halves and building each half concurrently.
    ///
    /// Sequences shorter than `threshold` (or nested deeper than [`DEFAULT_MAX_DEPTH`]
    /// forks) are inserted sequentially. Both halves of a fork start from `self` and the
    /// results are combined with [`MergeStrategy::SortedRebuild`].
    ///
    /// The set of values in the result is the same as for [`RbTree::insert_many`] for any
    /// `threshold`; the shape of the tree may differ.
    ///
    /// # Arguments
    ///
    /// * `values` - The values to insert
    /// * `threshold` - Minimum length of a sequence worth splitting
    ///
    /// # Returns
    ///
    /// * `Self` - A tree holding the union of `self` and `values`
    ///
    /// # Examples
    ///
    /// ```
    /// # use persistent_rbtree::RbTree;
    /// let values: Vec<u32> = (0..10_000).map(|i| (i * 7) % 5000).collect();
    /// let tree = RbTree::new().parallel_insert(&values, 1000);
    ///
    /// assert_eq!(tree.len(), 5000);
    /// assert!(tree.verify().is_ok());
    /// ```
    pub fn parallel_insert(&self, values: &[T], threshold: usize) -> Self {
        parallel_insert(self, values, threshold)
    }

    /// Inserts `values` by fork-join under the given configuration.
    ///
    /// # Arguments
    ///
    /// * `values` - The values to insert
    /// * `config` - Threshold, depth, merge strategy, timeout and pool settings
    ///
    /// # Returns
    ///
    /// * `Result<Self, BuildError>` - The new tree, or why the build was abandoned. On
    ///   timeout every partial tree is discarded; `self` is unaffected either way.
    pub fn parallel_insert_with(
        &self,
        values: &[T],
        config: &ParallelConfig,
    ) -> Result<Self, BuildError> {
        let started = Instant::now();
        debug!(
            "parallel insert of {} values with {:?}",
            values.len(),
            config
        );

        let run = || match config.timeout.and_then(|t| Deadline::after(started, t)) {
            Some(deadline) => ForkJoin::new(config, deadline)
                .build(self, values, 0)
                .map_err(|Cancelled| {
                    let timeout = config.timeout.unwrap_or_default();
                    warn!("parallel insert cancelled after exceeding {timeout:?}");
                    BuildError::DeadlineExceeded { timeout }
                }),
            None => Ok(into_ok(
                ForkJoin::new(config, Unbounded).build(self, values, 0),
            )),
        };

        let tree = match config.num_threads {
            Some(num_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()?
                .install(run)?,
            None => run()?,
        };

        debug!(
            "parallel insert finished with {} values in {:?}",
            tree.len(),
            started.elapsed()
        );
        Ok(tree)
    }
}

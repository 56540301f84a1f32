//! Core traits for streaming estimators
//!
//! Estimators implement the base [`Sketch`] trait; quantile trackers add
//! [`QuantileEstimator`] on top of it.

use core::fmt::Debug;

/// Core trait for all streaming sketches
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Reset sketch to its freshly constructed state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Single-quantile estimation over an integer stream
pub trait QuantileEstimator: Sketch<Item = i64> {
    /// The quantile this estimator tracks, in (0, 1)
    fn target(&self) -> f64;

    /// Current approximation of the target quantile
    fn estimate(&self) -> i64;
}

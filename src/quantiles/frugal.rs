//! Frugal-2U streaming quantile tracker
//!
//! Implementation of the Frugal-2U algorithm from Ma, Muthukrishnan and
//! Sandler, "Frugal Streaming for Estimating Quantiles" (2013).
//!
//! The tracker keeps a single integer estimate of one quantile and nudges it
//! towards each new sample with a probability tuned by the target quantile.
//! Consecutive moves in the same direction grow the step size; a reversal
//! collapses it back to the unit step. State is three integers and a flag,
//! regardless of stream length.
//!
//! # Thread Safety
//!
//! `Frugal2U` is mutated through `&mut self`. To feed one stream into several
//! trackers from multiple threads, use [`FrugalQuantiles`](super::FrugalQuantiles).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{check_target, QuantileError};
use crate::quantiles::step::StepGrowth;
use crate::traits::{QuantileEstimator, Sketch};

/// Direction of the last committed move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// No sample observed yet
    Unset,
    /// Last move increased the estimate (also the state right after warm-up)
    Up,
    /// Last move decreased the estimate
    Down,
}

impl Direction {
    #[inline]
    fn sign(self) -> i64 {
        match self {
            Direction::Unset => 0,
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Frugal-2U quantile tracker over an `i64` stream
///
/// - O(1) time per insertion, no allocation
/// - Constant memory
/// - One uniform draw per insertion that differs from the current estimate
///
/// The random source `R` is injectable so trajectories can be reproduced.
///
/// # Example
///
/// ```
/// use frugalstats::quantiles::Frugal2U;
///
/// let mut p90 = Frugal2U::with_seed(0.9, 0, 42).unwrap();
///
/// for latency in [12, 40, 18, 95, 33, 27, 61, 15, 22, 70] {
///     p90.insert(latency);
/// }
///
/// // The first sample seeds the estimate; later moves never cross a sample
/// assert!(p90.current() >= 12 && p90.current() <= 95);
/// ```
#[derive(Clone, Debug)]
pub struct Frugal2U<R = StdRng> {
    /// Target quantile in (0, 1)
    target: f64,
    /// Estimate supplied at construction, restored by `clear`
    initial: i64,
    /// Current estimate
    estimate: i64,
    /// Magnitude of the last adjustment, may go non-positive transiently
    step: i64,
    direction: Direction,
    growth: StepGrowth,
    /// Number of values observed
    count: u64,
    rng: R,
}

impl Frugal2U<StdRng> {
    /// Create a tracker seeded from system entropy
    ///
    /// # Errors
    ///
    /// Returns [`QuantileError::InvalidTarget`] if `target` is not in (0, 1).
    pub fn new(target: f64, initial: i64) -> Result<Self, QuantileError> {
        Self::with_rng(target, initial, StdRng::from_entropy())
    }

    /// Create a tracker with a reproducible random source
    pub fn with_seed(target: f64, initial: i64, seed: u64) -> Result<Self, QuantileError> {
        Self::with_rng(target, initial, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Frugal2U<R> {
    /// Create a tracker drawing from the given random source
    ///
    /// # Errors
    ///
    /// Returns [`QuantileError::InvalidTarget`] if `target` is not in (0, 1).
    pub fn with_rng(target: f64, initial: i64, rng: R) -> Result<Self, QuantileError> {
        let target = check_target(target)?;
        Ok(Self {
            target,
            initial,
            estimate: initial,
            step: 1,
            direction: Direction::Unset,
            growth: StepGrowth::default(),
            count: 0,
            rng,
        })
    }

    /// Replace the step growth function
    pub fn with_step_growth(mut self, growth: StepGrowth) -> Self {
        self.growth = growth;
        self
    }

    /// Observe one sample
    ///
    /// The first sample replaces the estimate outright. Afterwards the
    /// estimate moves towards `value` with probability `target` (upwards) or
    /// `1 - target` (downwards), and never past `value`.
    pub fn insert(&mut self, value: i64) {
        self.count += 1;

        if self.direction == Direction::Unset {
            self.estimate = value;
            self.direction = Direction::Up;
            return;
        }

        if value == self.estimate {
            return;
        }

        let r: f64 = self.rng.gen();
        if value > self.estimate {
            if r > 1.0 - self.target {
                self.move_up(value);
            }
        } else if r > self.target {
            self.move_down(value);
        }
    }

    fn move_up(&mut self, value: i64) {
        let delta = self.direction.sign().saturating_mul(self.growth.increment(self.step));
        self.step = self.step.saturating_add(delta);

        self.estimate = if self.step > 0 {
            self.estimate.saturating_add(self.step)
        } else {
            // estimate < value, cannot overflow
            self.estimate + 1
        };

        if self.estimate > value {
            self.step = self.step.saturating_add(value.saturating_sub(self.estimate));
            self.estimate = value;
        }

        if self.direction == Direction::Down {
            self.step = 1;
        }
        self.direction = Direction::Up;
    }

    fn move_down(&mut self, value: i64) {
        let delta = self.direction.sign().saturating_mul(self.growth.increment(self.step));
        self.step = self.step.saturating_sub(delta);

        self.estimate = if self.step > 0 {
            self.estimate.saturating_sub(self.step)
        } else {
            // estimate > value, cannot underflow
            self.estimate - 1
        };

        if self.estimate < value {
            self.step = self.step.saturating_add(self.estimate.saturating_sub(value));
            self.estimate = value;
        }

        if self.direction == Direction::Up {
            self.step = 1;
        }
        self.direction = Direction::Down;
    }
}

impl<R> Frugal2U<R> {
    /// The quantile being tracked
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current estimate of the target quantile
    pub fn current(&self) -> i64 {
        self.estimate
    }

    /// Estimate supplied at construction
    pub fn initial(&self) -> i64 {
        self.initial
    }

    /// Current step size
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Direction of the last committed move
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Step growth function in use
    pub fn step_growth(&self) -> StepGrowth {
        self.growth
    }
}

impl<R: Rng + Clone + core::fmt::Debug> Sketch for Frugal2U<R> {
    type Item = i64;

    fn update(&mut self, item: &i64) {
        self.insert(*item);
    }

    fn clear(&mut self) {
        self.estimate = self.initial;
        self.step = 1;
        self.direction = Direction::Unset;
        self.count = 0;
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Rng + Clone + core::fmt::Debug> QuantileEstimator for Frugal2U<R> {
    fn target(&self) -> f64 {
        self.target
    }

    fn estimate(&self) -> i64 {
        self.estimate
    }
}

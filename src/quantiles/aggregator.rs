//! Multi-quantile aggregator over one shared stream
//!
//! [`FrugalQuantiles`] drives several [`Frugal2U`] trackers from a single
//! stream. Inserts are serialized by one lock held across the whole fan-out,
//! so every tracker sees the same values in the same order. Reads go through
//! per-tracker atomics and never block on a writer.

use core::sync::atomic::{AtomicI64, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuantileError;
use crate::quantiles::frugal::Frugal2U;
use crate::quantiles::step::StepGrowth;

/// Quantiles tracked by [`FrugalQuantilesBuilder::with_default_quantiles`]
pub const DEFAULT_QUANTILES: &[f64] = &[0.5, 0.9, 0.95, 0.99];

// splitmix64 increment, spreads per-tracker seeds apart
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Latest estimate of one tracker, readable without the insert lock
#[derive(Debug)]
struct Published {
    target: f64,
    estimate: AtomicI64,
}

#[derive(Debug)]
struct Inner<R> {
    trackers: Vec<Frugal2U<R>>,
    /// Values inserted so far
    count: u64,
}

/// A fixed set of Frugal-2U trackers fed from one stream
///
/// `insert` is one critical section: no tracker can apply half of one call
/// and half of another. `get` reads published estimates and may see tracker
/// A after the Nth insert while tracker B still reflects the (N-1)th; each
/// individual estimate is always one a tracker actually held.
///
/// # Example
///
/// ```
/// use frugalstats::quantiles::FrugalQuantiles;
///
/// let latencies = FrugalQuantiles::new(&[(0.5, 100), (0.99, 100)]).unwrap();
///
/// for ms in [87, 120, 95, 300, 101, 99, 92, 110] {
///     latencies.insert(ms);
/// }
///
/// let p99 = latencies.get(0.99);
/// assert!(p99 >= 87 && p99 <= 300);
///
/// // Lookup is by exact target; unknown quantiles read as 0
/// assert_eq!(latencies.get(0.75), 0);
/// ```
#[derive(Debug)]
pub struct FrugalQuantiles<R = StdRng> {
    inner: Mutex<Inner<R>>,
    published: Vec<Published>,
}

impl FrugalQuantiles<StdRng> {
    /// Build one entropy-seeded tracker per `(target, initial_estimate)` pair
    ///
    /// Duplicate targets are kept and updated independently.
    ///
    /// # Errors
    ///
    /// Returns [`QuantileError::InvalidTarget`] for the first target outside
    /// (0, 1); no aggregator is built in that case.
    pub fn new(pairs: &[(f64, i64)]) -> Result<Self, QuantileError> {
        let trackers = pairs
            .iter()
            .map(|&(target, initial)| Frugal2U::new(target, initial))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_trackers(trackers))
    }

    /// Build one tracker per target, all starting from the same estimate
    pub fn with_quantiles(targets: &[f64], initial: i64) -> Result<Self, QuantileError> {
        Self::builder().quantiles(targets, initial).build()
    }

    /// Start configuring an aggregator
    pub fn builder() -> FrugalQuantilesBuilder {
        FrugalQuantilesBuilder::default()
    }
}

impl<R: Rng> FrugalQuantiles<R> {
    /// Wrap pre-built trackers, preserving their order
    pub fn from_trackers(trackers: Vec<Frugal2U<R>>) -> Self {
        let published = trackers
            .iter()
            .map(|t| Published { target: t.target(), estimate: AtomicI64::new(t.current()) })
            .collect();

        tracing::debug!(
            trackers = trackers.len(),
            targets = ?trackers.iter().map(Frugal2U::target).collect::<Vec<_>>(),
            "built frugal quantile aggregator"
        );

        Self { inner: Mutex::new(Inner { trackers, count: 0 }), published }
    }

    /// Feed one value to every tracker
    pub fn insert(&self, value: i64) {
        let mut inner = self.inner.lock();
        Self::fan_out(&mut inner, &self.published, value);
    }

    /// Feed a batch of values, each fanned out completely before the next
    pub fn extend<I: IntoIterator<Item = i64>>(&self, values: I) {
        let mut inner = self.inner.lock();
        for value in values {
            Self::fan_out(&mut inner, &self.published, value);
        }
    }

    fn fan_out(inner: &mut Inner<R>, published: &[Published], value: i64) {
        for (tracker, slot) in inner.trackers.iter_mut().zip(published) {
            tracker.insert(value);
            slot.estimate.store(tracker.current(), Ordering::Release);
        }
        inner.count += 1;
    }

    /// Copy of every tracker, taken between two inserts
    pub fn snapshot(&self) -> Vec<Frugal2U<R>>
    where
        R: Clone,
    {
        self.inner.lock().trackers.clone()
    }
}

impl<R> FrugalQuantiles<R> {
    /// Current estimate of the tracker whose target equals `target` exactly
    ///
    /// Returns 0 when no tracker matches. The comparison is `==` on `f64`:
    /// pass the same literal used at construction.
    pub fn get(&self, target: f64) -> i64 {
        self.try_get(target).unwrap_or_else(|| {
            tracing::trace!(target_quantile = target, "no tracker for quantile");
            0
        })
    }

    /// Like [`get`](Self::get), but reports a miss as `None`
    pub fn try_get(&self, target: f64) -> Option<i64> {
        self.published
            .iter()
            .find(|slot| slot.target == target)
            .map(|slot| slot.estimate.load(Ordering::Acquire))
    }

    /// `(target, estimate)` for every tracker, in construction order
    pub fn estimates(&self) -> Vec<(f64, i64)> {
        self.published
            .iter()
            .map(|slot| (slot.target, slot.estimate.load(Ordering::Acquire)))
            .collect()
    }

    /// Targets in construction order, duplicates included
    pub fn quantiles(&self) -> Vec<f64> {
        self.published.iter().map(|slot| slot.target).collect()
    }

    /// Number of trackers
    pub fn len(&self) -> usize {
        self.published.len()
    }

    /// True when built without trackers
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Number of values inserted
    pub fn count(&self) -> u64 {
        self.inner.lock().count
    }
}

/// Configuration for [`FrugalQuantiles`]
///
/// Targets are validated in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct FrugalQuantilesBuilder {
    pairs: Vec<(f64, i64)>,
    seed: Option<u64>,
    growth: StepGrowth,
}

impl FrugalQuantilesBuilder {
    /// Track `target`, starting from `initial`
    pub fn quantile(mut self, target: f64, initial: i64) -> Self {
        self.pairs.push((target, initial));
        self
    }

    /// Track every target in `targets`, all starting from `initial`
    pub fn quantiles(mut self, targets: &[f64], initial: i64) -> Self {
        self.pairs.extend(targets.iter().map(|&target| (target, initial)));
        self
    }

    /// Track [`DEFAULT_QUANTILES`]
    pub fn with_default_quantiles(self, initial: i64) -> Self {
        self.quantiles(DEFAULT_QUANTILES, initial)
    }

    /// Seed the random sources; tracker `i` gets its own seed derived from `seed`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Step growth function shared by every tracker
    pub fn step_growth(mut self, growth: StepGrowth) -> Self {
        self.growth = growth;
        self
    }

    /// Validate the configuration and build the aggregator
    ///
    /// # Errors
    ///
    /// Returns [`QuantileError::InvalidTarget`] for the first target outside
    /// (0, 1).
    pub fn build(self) -> Result<FrugalQuantiles<StdRng>, QuantileError> {
        let trackers = self
            .pairs
            .iter()
            .enumerate()
            .map(|(i, &(target, initial))| {
                let rng = match self.seed {
                    Some(seed) => {
                        let offset = (i as u64).wrapping_mul(SEED_STRIDE);
                        StdRng::seed_from_u64(seed.wrapping_add(offset))
                    }
                    None => StdRng::from_entropy(),
                };
                Frugal2U::with_rng(target, initial, rng).map(|t| t.with_step_growth(self.growth))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FrugalQuantiles::from_trackers(trackers))
    }
}

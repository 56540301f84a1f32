//! Correctness and invariant tests for frugalstats
//!
//! These tests verify the invariants of the Frugal-2U tracker and the
//! guarantees of the multi-quantile aggregator. They complement the unit tests
//! in each module by focusing on properties that must hold for any stream.
//!
//! Run with: cargo test --test correctness

use std::sync::Arc;
use std::thread;

use frugalstats::quantiles::{Frugal2U, FrugalQuantiles, StepGrowth};
use frugalstats::traits::{QuantileEstimator, Sketch};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Yields the largest f64 below 1.0, so every probabilistic gate fires.
#[derive(Clone, Debug)]
struct AlwaysFire;

impl RngCore for AlwaysFire {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }
    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0xff);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn uniform_stream(seed: u64, len: usize, range: core::ops::Range<i64>) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(range.clone())).collect()
}

// ============================================================================
// Frugal-2U tracker
// ============================================================================

mod tracker {
    use super::*;

    #[test]
    fn warm_up_sets_estimate_for_any_target() {
        for (i, target) in [0.001, 0.1, 0.5, 0.9, 0.999].into_iter().enumerate() {
            let mut tracker = Frugal2U::with_seed(target, 123_456, i as u64).unwrap();
            tracker.insert(-42);
            assert_eq!(
                tracker.current(),
                -42,
                "first insert must replace the estimate (target {})",
                target
            );
        }
    }

    #[test]
    fn estimate_never_crosses_the_sample() {
        for seed in 0..20u64 {
            for growth in [StepGrowth::Unit, StepGrowth::Linear, StepGrowth::Sqrt, StepGrowth::Log] {
                let target = 0.05 + 0.045 * seed as f64;
                let mut tracker = Frugal2U::with_seed(target, 0, seed)
                    .unwrap()
                    .with_step_growth(growth);

                for value in uniform_stream(seed + 1_000, 5_000, -1_000_000..1_000_000) {
                    let before = tracker.current();
                    tracker.insert(value);
                    let after = tracker.current();

                    if tracker.count() == 1 {
                        assert_eq!(after, value);
                        continue;
                    }

                    let (lo, hi) = if before <= value { (before, value) } else { (value, before) };
                    assert!(
                        lo <= after && after <= hi,
                        "estimate moved from {} to {} on sample {} ({:?}, seed {})",
                        before,
                        after,
                        value,
                        growth,
                        seed
                    );
                }
            }
        }
    }

    #[test]
    fn constant_stream_converges_and_stays() {
        for (seed, target) in [0.05, 0.5, 0.95].into_iter().enumerate() {
            for (start, value) in [(0i64, 1_000i64), (1_000, 0)] {
                let mut tracker = Frugal2U::with_seed(target, 0, seed as u64).unwrap();
                tracker.insert(start);

                let mut reached_at = None;
                for i in 0..20_000 {
                    tracker.insert(value);
                    if tracker.current() == value {
                        reached_at = Some(i);
                        break;
                    }
                }
                assert!(
                    reached_at.is_some(),
                    "target {} never reached {} from {} (stuck at {})",
                    target,
                    value,
                    start,
                    tracker.current()
                );

                for _ in 0..1_000 {
                    tracker.insert(value);
                    assert_eq!(tracker.current(), value);
                }
            }
        }
    }

    #[test]
    fn high_target_concentrates_near_maximum() {
        let mut tracker = Frugal2U::with_seed(0.99, 500, 1).unwrap();
        for value in uniform_stream(11, 200_000, 0..1_000) {
            tracker.insert(value);
        }
        assert!(tracker.current() > 900, "p99 estimate {} not near 999", tracker.current());
    }

    #[test]
    fn low_target_concentrates_near_minimum() {
        let mut tracker = Frugal2U::with_seed(0.01, 500, 2).unwrap();
        for value in uniform_stream(12, 200_000, 0..1_000) {
            tracker.insert(value);
        }
        assert!(tracker.current() < 100, "p01 estimate {} not near 0", tracker.current());
    }

    #[test]
    fn median_target_concentrates_near_middle() {
        let mut tracker = Frugal2U::with_seed(0.5, 0, 3).unwrap();
        for value in uniform_stream(13, 200_000, 0..1_000) {
            tracker.insert(value);
        }
        let estimate = tracker.current();
        assert!((300..=700).contains(&estimate), "median estimate {} not near 500", estimate);
    }

    #[test]
    fn targets_order_their_estimates() {
        let stream = uniform_stream(21, 200_000, 0..10_000);
        let estimates: Vec<i64> = [0.1, 0.5, 0.9]
            .into_iter()
            .enumerate()
            .map(|(i, target)| {
                let mut tracker = Frugal2U::with_seed(target, 5_000, 30 + i as u64).unwrap();
                for &value in &stream {
                    tracker.insert(value);
                }
                tracker.current()
            })
            .collect();

        assert!(
            estimates[0] < estimates[1] && estimates[1] < estimates[2],
            "estimates out of order: {:?}",
            estimates
        );
    }

    #[test]
    fn p90_scenario_trends_upward() {
        let scenario = [10, 95, 95, 95, 95, 95, 95, 95, 95, 95, 95];

        // Every gate open pins the trajectory exactly
        let mut pinned = Frugal2U::with_rng(0.9, 50, AlwaysFire).unwrap();
        for value in scenario {
            pinned.insert(value);
        }
        assert_eq!(pinned.current(), 75);

        // Under a real random source the estimate stays within the samples
        for seed in 0..100 {
            let mut tracker = Frugal2U::with_seed(0.9, 50, seed).unwrap();
            for value in scenario {
                tracker.insert(value);
            }
            assert!((10..=95).contains(&tracker.current()));
        }
    }

    #[test]
    fn trait_views_agree_with_inherent_accessors() {
        let mut tracker = Frugal2U::with_seed(0.75, 0, 8).unwrap();
        for value in uniform_stream(8, 1_000, 0..100) {
            tracker.update(&value);
        }
        assert_eq!(tracker.count(), 1_000);
        assert_eq!(QuantileEstimator::estimate(&tracker), tracker.current());
        assert_eq!(QuantileEstimator::target(&tracker), 0.75);
    }
}

// ============================================================================
// Aggregator
// ============================================================================

mod aggregator {
    use super::*;

    #[test]
    fn fan_out_matches_independent_trackers() {
        let targets = [0.1, 0.5, 0.9, 0.5];
        let trackers: Vec<_> = targets
            .iter()
            .enumerate()
            .map(|(i, &q)| Frugal2U::with_seed(q, 0, 100 + i as u64).unwrap())
            .collect();

        let mut standalone = trackers.clone();
        let agg = FrugalQuantiles::from_trackers(trackers);

        for value in uniform_stream(5, 20_000, 0..5_000) {
            agg.insert(value);
            for tracker in standalone.iter_mut() {
                tracker.insert(value);
            }
        }

        let snapshot = agg.snapshot();
        for (inside, outside) in snapshot.iter().zip(&standalone) {
            assert_eq!(inside.count(), 20_000);
            assert_eq!(inside.current(), outside.current());
            assert_eq!(inside.step(), outside.step());
        }
    }

    #[test]
    fn concurrent_inserts_reach_every_tracker_once() {
        let threads = 8u64;
        let per_thread = 5_000usize;

        let agg = Arc::new(
            FrugalQuantiles::builder()
                .with_default_quantiles(500)
                .quantile(0.5, 500)
                .seed(9)
                .build()
                .unwrap(),
        );

        thread::scope(|scope| {
            for t in 0..threads {
                let agg = Arc::clone(&agg);
                scope.spawn(move || {
                    for value in uniform_stream(t, per_thread, 0..1_000) {
                        agg.insert(value);
                    }
                });
            }

            // Readers run alongside writers and only ever see real estimates
            for _ in 0..2 {
                let agg = Arc::clone(&agg);
                scope.spawn(move || {
                    for _ in 0..10_000 {
                        for (_, estimate) in agg.estimates() {
                            assert!((0..1_000).contains(&estimate));
                        }
                        let p99 = agg.get(0.99);
                        assert!((0..1_000).contains(&p99));
                    }
                });
            }
        });

        let total = threads * per_thread as u64;
        assert_eq!(agg.count(), total);
        for tracker in agg.snapshot() {
            assert_eq!(tracker.count(), total, "tracker {} skipped values", tracker.target());
        }
    }

    #[test]
    fn get_returns_live_tracker_value() {
        let agg = FrugalQuantiles::builder()
            .quantile(0.25, 0)
            .quantile(0.75, 0)
            .seed(4)
            .build()
            .unwrap();

        agg.extend(uniform_stream(6, 10_000, 0..1_000));

        let snapshot = agg.snapshot();
        assert_eq!(agg.get(0.25), snapshot[0].current());
        assert_eq!(agg.get(0.75), snapshot[1].current());
        assert_eq!(agg.get(0.5), 0);
        assert_eq!(agg.get(0.250_000_000_000_1), 0);
    }

    #[test]
    fn duplicate_targets_resolve_to_first() {
        let agg = FrugalQuantiles::from_trackers(vec![
            Frugal2U::with_seed(0.5, 2, 0).unwrap(),
            Frugal2U::with_seed(0.5, 3, 1).unwrap(),
        ]);

        assert_eq!(agg.get(0.5), 2);
        assert_eq!(agg.estimates(), vec![(0.5, 2), (0.5, 3)]);

        agg.insert(40);
        assert_eq!(agg.estimates(), vec![(0.5, 40), (0.5, 40)]);
    }

    #[test]
    fn invalid_target_yields_no_aggregator() {
        for bad in [0.0, 1.0, 2.0, -0.1, f64::NAN] {
            assert!(FrugalQuantiles::new(&[(0.5, 0), (bad, 0)]).is_err());
            assert!(FrugalQuantiles::with_quantiles(&[bad], 0).is_err());
        }
    }
}

//! Quantile estimation algorithms
//!
//! This module provides constant-memory estimators for quantiles
//! (percentiles) of an integer stream.
//!
//! # Algorithms
//!
//! - [`Frugal2U`]: single-quantile tracker with a randomized, self-scaling step
//! - [`FrugalQuantiles`]: several trackers fed from one stream behind one lock
//!
//! # Example
//!
//! ```
//! use frugalstats::quantiles::FrugalQuantiles;
//!
//! let quantiles = FrugalQuantiles::builder()
//!     .quantile(0.5, 0)
//!     .quantile(0.95, 0)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! for value in 1..=1_000 {
//!     quantiles.insert(value);
//! }
//!
//! println!("p50 ~ {}, p95 ~ {}", quantiles.get(0.5), quantiles.get(0.95));
//! ```

mod aggregator;
mod frugal;
mod step;

pub use aggregator::{FrugalQuantiles, FrugalQuantilesBuilder, DEFAULT_QUANTILES};
pub use frugal::{Direction, Frugal2U};
pub use step::StepGrowth;

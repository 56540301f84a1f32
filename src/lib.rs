//! # Frugalstats
//!
//! Constant-memory streaming quantile estimation for Rust.
//!
//! Frugalstats tracks approximate quantiles of an unbounded integer stream
//! (request latencies, queue depths, payload sizes) without storing any
//! history. Each tracked quantile costs a handful of integers.
//!
//! ## Features
//!
//! - **Frugal-2U**: one randomized tracker per quantile, O(1) update
//! - **Shared stream**: fan one stream out to several trackers under one lock
//! - **Lock-free reads**: current estimates are readable while inserts run
//! - **Reproducible**: every tracker draws from an injectable random source
//!
//! ## Quick Start
//!
//! ```rust
//! use frugalstats::prelude::*;
//!
//! let latencies = FrugalQuantiles::new(&[(0.5, 0), (0.9, 0), (0.99, 0)]).unwrap();
//!
//! for ms in [12, 15, 11, 80, 14, 13, 250, 16, 12, 18] {
//!     latencies.insert(ms);
//! }
//!
//! println!("p90 latency: ~{}ms", latencies.get(0.9));
//! ```
//!
//! ## Single tracker
//!
//! ```rust
//! use frugalstats::quantiles::Frugal2U;
//!
//! let mut median = Frugal2U::with_seed(0.5, 0, 42).unwrap();
//! median.insert(10);
//! assert_eq!(median.current(), 10);
//! ```
//!
//! ## Accuracy
//!
//! Estimates are approximate and drift with the stream: they converge towards
//! the target quantile over many samples, but a single estimate carries no
//! formal error bound. Lookups on [`FrugalQuantiles`] match the target by exact
//! `f64` equality.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod quantiles;
pub mod traits;

pub mod prelude {
    pub use crate::error::QuantileError;
    pub use crate::quantiles::{Frugal2U, FrugalQuantiles, FrugalQuantilesBuilder, StepGrowth};
    pub use crate::traits::*;
}

pub use error::QuantileError;
pub use quantiles::{Frugal2U, FrugalQuantiles};

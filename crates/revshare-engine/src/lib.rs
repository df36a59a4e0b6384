//! # revshare-engine — Creator revenue-share optimization engine.
//!
//! Converts per-video engagement signals into monetary payouts from a fixed
//! shared pool:
//! - **Quality scoring**: a conjunctive weighted geometric mean of five
//!   engagement signals, hard-gated by compliance.
//! - **Share derivation**: quality-weighted volumes normalized into market
//!   shares, with a concave transform (`s^α`) producing fairness weights.
//! - **Piecewise-log relaxation**: geometrically spaced breakpoints keep the
//!   relative approximation error of `ln` uniform across payout magnitudes.
//! - **Pool allocation**: budget-constrained Nash-bargaining-style objective
//!   trading weighted log-utility against share proportionality.
//! - **Tier split**: two-variable normal/premium payout-fraction problem with
//!   a mandated premium gap and a platform revenue floor.
//!
//! Every run is a stateless, single-shot computation over an immutable input
//! snapshot; the solver is reached only through the
//! [`OptimizationBackend`](revshare_core::traits::OptimizationBackend) seam.

pub mod persist;
pub mod pool;
pub mod pwl;
pub mod quality;
pub mod shares;
pub mod tier;

pub use pool::PoolAllocator;
pub use pwl::LogCurve;
pub use quality::QualityScorer;
pub use shares::derive_shares;
pub use tier::TierSplitOptimizer;

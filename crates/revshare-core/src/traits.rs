//! Trait interfaces of the engine's external collaborators:
//! - [`OptimizationBackend`] — generic linear/convex solver (revshare-simplex
//!   provides the reference implementation)
//! - [`PayoutStore`] — persistence collaborator receiving results as atomic
//!   batch writes, gated on optimal status by the caller

use std::time::Duration;

use crate::error::{SolverError, StoreError};
use crate::model::{Model, Solution};
use crate::types::VideoId;

/// A solver capable of bounded continuous variables, linear
/// equality/inequality constraints, piecewise-linear (or native logarithmic)
/// generalized constraints, and a linear objective.
///
/// Each solve is a synchronous, single-shot computation over an immutable
/// model; identical models yield identical solutions up to numerical
/// tolerance. Backends must respect `time_budget` and surface an exceeded
/// budget as [`SolverError::Timeout`] rather than truncating silently.
pub trait OptimizationBackend: Send + Sync {
    /// Solve `model` to optimality within `time_budget`.
    ///
    /// A returned [`Solution`] carries a status distinguishing
    /// optimal / infeasible / unbounded; convergence failures and exceeded
    /// time budgets are errors.
    fn solve(&self, model: &Model, time_budget: Duration) -> Result<Solution, SolverError>;

    /// Whether the backend accepts
    /// [`GenConstraint::NaturalLog`](crate::model::GenConstraint::NaturalLog)
    /// natively. Backends without native logarithm support receive a
    /// piecewise-linear relaxation instead.
    fn supports_native_log(&self) -> bool {
        false
    }
}

/// Persistence of allocation results, performed by the orchestration layer
/// after a successful solve.
///
/// Each write is an atomic batch: either every entry lands or none does.
/// Callers must gate writes on optimal solver status — a failed or
/// non-optimal run leaves previously persisted values untouched.
pub trait PayoutStore: Send + Sync {
    /// Persist pool payout proportions (each in [0, 1]) for one run.
    fn write_pool_proportions(&self, batch: &[(VideoId, f64)]) -> Result<(), StoreError>;

    /// Persist one video's tier-split fractions `(x_n, x_p)`.
    fn write_tier_fractions(
        &self,
        id: &VideoId,
        normal_fraction: f64,
        premium_fraction: f64,
    ) -> Result<(), StoreError>;
}

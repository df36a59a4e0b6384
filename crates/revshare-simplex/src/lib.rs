//! # revshare-simplex — reference [`OptimizationBackend`].
//!
//! A self-contained two-phase primal simplex solver. Piecewise-linear
//! generalized constraints are lowered to convex-combination form before
//! solving; native logarithm constraints are not supported, so the engine
//! always hands this backend the piecewise-linear relaxation.
//!
//! Intended as the in-tree reference and test backend. A production
//! deployment can swap in any solver implementing
//! [`OptimizationBackend`] without touching the engine.

use std::time::{Duration, Instant};

use tracing::debug;

use revshare_core::error::SolverError;
use revshare_core::model::{Model, Solution, SolveStatus};
use revshare_core::traits::OptimizationBackend;

mod expand;
mod simplex;

use simplex::LpOutcome;

const DEFAULT_MAX_ITERATIONS: usize = 20_000;

/// Dense two-phase simplex backend.
#[derive(Debug, Clone)]
pub struct SimplexBackend {
    max_iterations: usize,
}

impl SimplexBackend {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Cap the pivot count; exceeding it fails the solve with
    /// [`SolverError::Numerical`].
    pub fn with_iteration_limit(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for SimplexBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationBackend for SimplexBackend {
    fn solve(&self, model: &Model, time_budget: Duration) -> Result<Solution, SolverError> {
        let deadline = Instant::now()
            .checked_add(time_budget)
            .ok_or_else(|| SolverError::InvalidModel("time budget overflows".into()))?;
        let lp = expand::expand(model)?;
        debug!(
            model_vars = lp.num_model_vars,
            lp_vars = lp.num_vars,
            rows = lp.rows.len(),
            "expanded model to standard form"
        );

        match simplex::solve(&lp, deadline, self.max_iterations)? {
            LpOutcome::Optimal { values, objective } => {
                let model_values = values
                    .iter()
                    .take(lp.num_model_vars)
                    .zip(&lp.shifts)
                    .map(|(y, l)| y + l)
                    .collect();
                Ok(Solution {
                    status: SolveStatus::Optimal,
                    values: model_values,
                    objective,
                })
            }
            LpOutcome::Infeasible => Ok(Solution {
                status: SolveStatus::Infeasible,
                values: vec![0.0; lp.num_model_vars],
                objective: f64::NEG_INFINITY,
            }),
            LpOutcome::Unbounded => Ok(Solution {
                status: SolveStatus::Unbounded,
                values: vec![0.0; lp.num_model_vars],
                objective: f64::INFINITY,
            }),
        }
    }
}

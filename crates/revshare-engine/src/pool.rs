//! Pool-wide, budget-constrained payout allocation.

use tracing::{debug, info};

use revshare_core::config::PoolConfig;
use revshare_core::constants::FEASIBILITY_TOLERANCE;
use revshare_core::error::{AllocationError, SolverError, ValidationError};
use revshare_core::model::{LinearExpr, Model, Sense, SolveStatus};
use revshare_core::traits::OptimizationBackend;
use revshare_core::types::{PoolOutcome, PoolPayout, Video};

use crate::pwl::LogCurve;
use crate::quality::QualityScorer;
use crate::shares::derive_shares;

/// Solves the multi-video fairness/efficiency allocation problem:
/// maximize `λ_fair·Σ w_v·ln(p_v) + λ_eff·Σ s_v·(p_v/P)` subject to the
/// budget equality `Σ p_v = P` and per-video floors and caps.
///
/// The log term is strictly concave, so the marginal value of extra payout
/// diminishes and no single high-traffic video can monopolize the pool; the
/// linear efficiency term pulls the solution back toward quality-weighted
/// popularity. Non-compliant videos are fixed to zero payout and excluded
/// from the log relation.
#[derive(Debug, Clone)]
pub struct PoolAllocator {
    config: PoolConfig,
    scorer: QualityScorer,
}

struct Bounds {
    lower: f64,
    upper: f64,
}

impl PoolAllocator {
    pub fn new(config: PoolConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let scorer = QualityScorer::new(config.exponents)?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run one allocation over an immutable snapshot of videos.
    ///
    /// The entire pool is solved in a single run; there is no per-video
    /// partial solve. The run is stateless and idempotent — identical
    /// snapshots produce identical payouts up to solver tolerance.
    pub fn allocate(
        &self,
        videos: &[Video],
        backend: &dyn OptimizationBackend,
    ) -> Result<PoolOutcome, AllocationError> {
        for video in videos {
            video.validate()?;
        }
        let shares = derive_shares(
            videos,
            &self.scorer,
            self.config.alpha,
            self.config.low_quality.as_ref(),
        )?;

        let pwl = &self.config.pwl;
        let budget = self.config.budget;

        // Per-video payout bounds. Compliant floors are raised to the log
        // domain minimum so the log relation stays valid; caps are clipped
        // to the domain maximum for the same reason.
        let mut bounds = Vec::with_capacity(videos.len());
        for (video, share) in videos.iter().zip(&shares) {
            if !share.compliant {
                bounds.push(Bounds { lower: 0.0, upper: 0.0 });
                continue;
            }
            let lower = video.payout_floor.max(pwl.domain_min);
            let upper = video.payout_cap.min(pwl.domain_max);
            if lower > upper + FEASIBILITY_TOLERANCE {
                return Err(AllocationError::Infeasible(format!(
                    "payout bounds for {} are empty: floor {lower} exceeds cap {upper}",
                    video.id
                )));
            }
            bounds.push(Bounds { lower, upper });
        }

        let floor_sum: f64 = bounds.iter().map(|b| b.lower).sum();
        if floor_sum > budget + FEASIBILITY_TOLERANCE {
            return Err(AllocationError::Infeasible(format!(
                "budget below floor sum: {budget} < {floor_sum}"
            )));
        }
        let cap_sum: f64 = bounds.iter().map(|b| b.upper).sum();
        if cap_sum < budget - FEASIBILITY_TOLERANCE {
            // Caps are clipped to the log domain maximum above, so a budget
            // exceeding n·domain_max lands here even with unlimited caps.
            return Err(AllocationError::Infeasible(format!(
                "budget above cap sum: {budget} > {cap_sum} (per-video payouts \
                 are capped at the log domain maximum {}; raise pwl.domain_max \
                 to allow larger payouts)",
                pwl.domain_max
            )));
        }

        let curve = LogCurve::geometric(pwl.domain_min, pwl.domain_max, pwl.breakpoints)?;
        let (log_lo, log_hi) = (pwl.domain_min.ln(), pwl.domain_max.ln());
        let native_log = backend.supports_native_log();

        let mut model = Model::new();
        let mut payout_vars = Vec::with_capacity(videos.len());
        let mut objective = LinearExpr::new();
        let mut budget_expr = LinearExpr::new();

        for (share, b) in shares.iter().zip(&bounds) {
            let p = model.add_var(format!("p_{}", share.id), b.lower, b.upper);
            budget_expr = budget_expr.term(p, 1.0);
            if share.compliant {
                // z_v ≈ ln(p_v), linked through the backend's native log or
                // the piecewise-linear relaxation.
                let z = model.add_var(format!("log_{}", share.id), log_lo, log_hi);
                if native_log {
                    model.add_natural_log(format!("ln_{}", share.id), p, z);
                } else {
                    model.add_pwl(format!("pwl_log_{}", share.id), p, z, curve.points().to_vec());
                }
                objective = objective
                    .term(z, self.config.lambda_fair * share.weight)
                    .term(p, self.config.lambda_eff * share.share / budget);
            } else {
                // Compliance gate: payout fixed to 0, log variable fixed to 0
                // and excluded from the log relation (ln undefined at 0).
                let _z = model.add_var(format!("log_{}", share.id), 0.0, 0.0);
            }
            payout_vars.push(p);
        }

        model.add_constraint("budget", budget_expr, Sense::Equal, budget);
        model.set_objective(objective);
        debug!(
            videos = videos.len(),
            breakpoints = pwl.breakpoints,
            native_log,
            "built pool allocation model"
        );

        let solution = backend.solve(&model, self.config.solve_budget)?;
        match solution.status {
            SolveStatus::Optimal => {}
            SolveStatus::Infeasible => {
                return Err(AllocationError::Infeasible(
                    "solver reported jointly unsatisfiable constraints".into(),
                ));
            }
            SolveStatus::Unbounded => return Err(SolverError::Unbounded.into()),
        }

        let payouts = videos
            .iter()
            .zip(&payout_vars)
            .map(|(video, &var)| {
                let payout = solution.value(var);
                PoolPayout {
                    id: video.id.clone(),
                    payout,
                    proportion: payout / budget,
                }
            })
            .collect();

        info!(objective = solution.objective, budget, "pool allocation solved");
        Ok(PoolOutcome {
            payouts,
            objective: solution.objective,
            status: SolveStatus::Optimal,
        })
    }
}

//! Two-tier (normal/premium) payout-fraction optimization for one video.

use tracing::{debug, info};

use revshare_core::config::TierSplitConfig;
use revshare_core::error::{AllocationError, SolverError, ValidationError};
use revshare_core::model::{LinearExpr, Model, Sense, SolveStatus};
use revshare_core::traits::OptimizationBackend;
use revshare_core::types::{TierSplitOutcome, TierSplitRequest};

use crate::pwl::LogCurve;

/// Tolerance guarding degenerate normalization denominators.
const RANGE_TOL: f64 = 1e-12;

/// Solves the single-video split between the normal and premium coin pools.
///
/// Decision variables are the payout fractions `x_n ∈ [0, x_n_max]` and
/// `x_p ∈ [0, x_p_max]`. The premium tier must out-pay the normal tier by a
/// gap in `[δ, Δ]`, and the platform keeps at least a floor fraction of the
/// combined coin total. The objective trades retained revenue, creator
/// log-utility, and the premium-adoption incentive (the gap itself), each
/// normalized to its attainable range so the three weights stay comparable
/// across videos whose coin totals differ by orders of magnitude.
#[derive(Debug, Clone)]
pub struct TierSplitOptimizer {
    config: TierSplitConfig,
}

impl TierSplitOptimizer {
    pub fn new(config: TierSplitConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TierSplitConfig {
        &self.config
    }

    /// Run one split. Stateless and idempotent; gap-bound inversion and an
    /// unattainable revenue floor surface as [`AllocationError::Infeasible`].
    pub fn optimize(
        &self,
        request: &TierSplitRequest,
        backend: &dyn OptimizationBackend,
    ) -> Result<TierSplitOutcome, AllocationError> {
        request.validate()?;
        let cfg = &self.config;
        let (n_n, n_p) = (request.normal_coins, request.premium_coins);
        let total = request.total_coins();

        if cfg.min_gap > cfg.max_gap {
            return Err(AllocationError::Infeasible(format!(
                "premium gap bounds inverted: min {} > max {}",
                cfg.min_gap, cfg.max_gap
            )));
        }
        if cfg.min_gap > cfg.premium_fraction_max {
            return Err(AllocationError::Infeasible(format!(
                "minimum premium gap {} exceeds premium fraction cap {}",
                cfg.min_gap, cfg.premium_fraction_max
            )));
        }

        // Creator payout extremes over the gap/bound polygon. Payout is
        // increasing in both fractions, so the extremes sit at the polygon's
        // lower-left vertex (0, δ) and upper-right vertex.
        let xn_top = cfg
            .normal_fraction_max
            .min(cfg.premium_fraction_max - cfg.min_gap);
        let xp_top = cfg.premium_fraction_max.min(xn_top + cfg.max_gap);
        let pay_max = n_n * xn_top + n_p * xp_top;
        let pay_min = n_p * cfg.min_gap;

        let revenue_max = total - pay_min;
        let revenue_floor = cfg.revenue_floor_fraction * total;
        if revenue_floor > revenue_max + RANGE_TOL {
            return Err(AllocationError::Infeasible(format!(
                "revenue floor {revenue_floor} above attainable revenue {revenue_max}"
            )));
        }

        // Normalization ranges; a collapsed range contributes a constant, so
        // its denominator is pinned to 1 instead of dividing by ~0.
        let revenue_span = revenue_max - revenue_floor;
        let revenue_den = if revenue_span > RANGE_TOL { revenue_span } else { 1.0 };
        let gap_span = cfg.max_gap - cfg.min_gap;
        let gap_den = if gap_span > RANGE_TOL { gap_span } else { 1.0 };
        let utility_rate = 1.0 + cfg.theta * request.quality;
        let utility_max = utility_rate * (cfg.epsilon + pay_max).ln();
        let utility_den = if utility_max > RANGE_TOL { utility_max } else { 1.0 };

        let mut model = Model::new();
        let x_n = model.add_var("x_n", 0.0, cfg.normal_fraction_max);
        let x_p = model.add_var("x_p", 0.0, cfg.premium_fraction_max);

        // arg = ε + pay, kept strictly positive so the log relation is valid
        // over the whole payout range.
        let arg_hi = cfg.epsilon + pay_max;
        let arg = model.add_var("pay_arg", cfg.epsilon, arg_hi);
        let z = model.add_var("log_pay", cfg.epsilon.ln(), arg_hi.ln());
        model.add_constraint(
            "pay_arg_link",
            LinearExpr::new()
                .term(arg, 1.0)
                .term(x_n, -n_n)
                .term(x_p, -n_p),
            Sense::Equal,
            cfg.epsilon,
        );
        if backend.supports_native_log() {
            model.add_natural_log("ln_pay", arg, z);
        } else {
            let curve = LogCurve::geometric(cfg.epsilon, arg_hi, cfg.log_breakpoints)?;
            model.add_pwl("pwl_log_pay", arg, z, curve.points().to_vec());
        }

        let gap = LinearExpr::new().term(x_p, 1.0).term(x_n, -1.0);
        model.add_constraint("gap_min", gap.clone(), Sense::GreaterEq, cfg.min_gap);
        model.add_constraint("gap_max", gap, Sense::LessEq, cfg.max_gap);
        // R ≥ R_min expressed on the payout side: pay ≤ total − R_min.
        model.add_constraint(
            "revenue_floor",
            LinearExpr::new().term(x_n, n_n).term(x_p, n_p),
            Sense::LessEq,
            total - revenue_floor,
        );

        // λ_rev·(R − R_min)/(R_max − R_min) + λ_util·U/U_max
        //   + λ_inc·(I − δ)/(Δ − δ), written out over x_n, x_p, z.
        let rev_scale = cfg.lambda_revenue / revenue_den;
        let inc_scale = cfg.lambda_incentive / gap_den;
        let objective = LinearExpr::new()
            .term(x_n, -rev_scale * n_n - inc_scale)
            .term(x_p, -rev_scale * n_p + inc_scale)
            .term(z, cfg.lambda_utility * utility_rate / utility_den)
            .offset(rev_scale * (total - revenue_floor) - inc_scale * cfg.min_gap);
        model.set_objective(objective);
        debug!(
            id = %request.id,
            pay_max,
            revenue_floor,
            breakpoints = cfg.log_breakpoints,
            "built tier-split model"
        );

        let solution = backend.solve(&model, cfg.solve_budget)?;
        match solution.status {
            SolveStatus::Optimal => {}
            SolveStatus::Infeasible => {
                return Err(AllocationError::Infeasible(
                    "solver reported jointly unsatisfiable constraints".into(),
                ));
            }
            SolveStatus::Unbounded => return Err(SolverError::Unbounded.into()),
        }

        let normal_fraction = solution.value(x_n);
        let premium_fraction = solution.value(x_p);
        let creator_payout = normal_fraction * n_n + premium_fraction * n_p;
        let outcome = TierSplitOutcome {
            id: request.id.clone(),
            normal_fraction,
            premium_fraction,
            creator_payout,
            retained_revenue: total - creator_payout,
            objective: solution.objective,
            status: SolveStatus::Optimal,
        };
        info!(
            id = %outcome.id,
            x_n = outcome.normal_fraction,
            x_p = outcome.premium_fraction,
            retained = outcome.retained_revenue,
            "tier split solved"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revshare_simplex::SimplexBackend;

    const TOL: f64 = 1e-6;

    fn request() -> TierSplitRequest {
        TierSplitRequest::new("v1", 1200.0, 600.0, 0.7)
    }

    #[test]
    fn optimal_split_respects_all_constraints() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let out = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap();

        assert_eq!(out.status, SolveStatus::Optimal);
        assert!(out.normal_fraction >= -TOL && out.normal_fraction <= 0.75 + TOL);
        assert!(out.premium_fraction >= -TOL && out.premium_fraction <= 0.95 + TOL);
        assert!(out.premium_gap() >= 0.05 - TOL, "gap {}", out.premium_gap());
        assert!(out.premium_gap() <= 0.35 + TOL, "gap {}", out.premium_gap());
        // Revenue floor: 10% of 1800 coins.
        assert!(out.retained_revenue >= 180.0 - TOL, "R {}", out.retained_revenue);
        assert!(out.creator_payout > 0.0);
        assert!(
            (out.creator_payout + out.retained_revenue - 1800.0).abs() < 1e-9
        );
    }

    #[test]
    fn premium_strictly_outpays_normal() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let out = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap();
        assert!(out.premium_fraction > out.normal_fraction);
    }

    #[test]
    fn inverted_gap_bounds_are_infeasible() {
        let cfg = TierSplitConfig { min_gap: 0.4, max_gap: 0.1, ..TierSplitConfig::default() };
        let optimizer = TierSplitOptimizer::new(cfg).unwrap();
        let err = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap_err();
        match err {
            AllocationError::Infeasible(reason) => {
                assert!(reason.contains("gap bounds inverted"), "{reason}");
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn gap_beyond_premium_cap_is_infeasible() {
        let cfg = TierSplitConfig {
            min_gap: 0.5,
            max_gap: 0.6,
            premium_fraction_max: 0.4,
            ..TierSplitConfig::default()
        };
        let optimizer = TierSplitOptimizer::new(cfg).unwrap();
        let err = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap_err();
        assert!(matches!(err, AllocationError::Infeasible(_)));
    }

    #[test]
    fn unattainable_revenue_floor_is_infeasible() {
        let cfg = TierSplitConfig {
            revenue_floor_fraction: 0.99,
            ..TierSplitConfig::default()
        };
        let optimizer = TierSplitOptimizer::new(cfg).unwrap();
        let err = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap_err();
        match err {
            AllocationError::Infeasible(reason) => {
                assert!(reason.contains("revenue floor"), "{reason}");
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn fixed_gap_is_handled() {
        // δ = Δ pins the gap; the normalized incentive term degenerates to a
        // constant and must not divide by zero.
        let cfg = TierSplitConfig { min_gap: 0.2, max_gap: 0.2, ..TierSplitConfig::default() };
        let optimizer = TierSplitOptimizer::new(cfg).unwrap();
        let out = optimizer.optimize(&request(), &SimplexBackend::new()).unwrap();
        assert!((out.premium_gap() - 0.2).abs() < TOL);
    }

    #[test]
    fn premium_only_coin_pool() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let req = TierSplitRequest::new("p-only", 0.0, 900.0, 0.5);
        let out = optimizer.optimize(&req, &SimplexBackend::new()).unwrap();
        assert!(out.premium_gap() >= 0.05 - TOL);
        assert!(out.retained_revenue >= 90.0 - TOL);
        assert!((out.creator_payout - out.premium_fraction * 900.0).abs() < 1e-9);
    }

    #[test]
    fn higher_quality_never_lowers_creator_payout() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let backend = SimplexBackend::new();
        let low = optimizer
            .optimize(&TierSplitRequest::new("v", 1200.0, 600.0, 0.1), &backend)
            .unwrap();
        let high = optimizer
            .optimize(&TierSplitRequest::new("v", 1200.0, 600.0, 0.9), &backend)
            .unwrap();
        assert!(high.creator_payout >= low.creator_payout - TOL);
    }

    #[test]
    fn zero_coin_request_rejected() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let req = TierSplitRequest::new("v", 0.0, 0.0, 0.5);
        let err = optimizer.optimize(&req, &SimplexBackend::new()).unwrap_err();
        assert!(matches!(err, AllocationError::Validation(_)));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let optimizer = TierSplitOptimizer::new(TierSplitConfig::default()).unwrap();
        let backend = SimplexBackend::new();
        let first = optimizer.optimize(&request(), &backend).unwrap();
        let second = optimizer.optimize(&request(), &backend).unwrap();
        assert_eq!(first.normal_fraction, second.normal_fraction);
        assert_eq!(first.premium_fraction, second.premium_fraction);
    }
}

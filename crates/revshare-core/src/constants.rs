//! Engine defaults and numeric tolerances. All monetary values are in
//! abstract pool units; coin totals are in coins.

use std::time::Duration;

/// Quality exponent for watch-completion rate (φ_W).
pub const DEFAULT_WATCH_EXPONENT: f64 = 0.35;
/// Quality exponent for engagement rate (φ_E).
pub const DEFAULT_ENGAGEMENT_EXPONENT: f64 = 0.25;
/// Quality exponent for engagement diversity (φ_D).
pub const DEFAULT_DIVERSITY_EXPONENT: f64 = 0.15;
/// Quality exponent for rewatch rate (φ_R).
pub const DEFAULT_REWATCH_EXPONENT: f64 = 0.10;
/// Quality exponent for semantic content quality (φ_S).
pub const DEFAULT_SEMANTIC_EXPONENT: f64 = 0.15;

/// Concavity exponent α applied to normalized shares when deriving
/// fairness weights. Must lie in (0, 1]; lower values push the pool
/// allocation toward an equal split.
pub const DEFAULT_FAIRNESS_ALPHA: f64 = 0.7;

/// Default total pool budget distributed per allocation run.
pub const DEFAULT_POOL_BUDGET: f64 = 1_000_000.0;
/// Weight of the log-utility (fairness) term in the pool objective.
pub const DEFAULT_LAMBDA_FAIR: f64 = 0.6;
/// Weight of the share-proportional (efficiency) term in the pool objective.
pub const DEFAULT_LAMBDA_EFF: f64 = 0.4;

/// Lower edge of the piecewise-log domain. Must be strictly positive so
/// the logarithm is defined; payout lower bounds are raised to this value.
pub const DEFAULT_LOG_DOMAIN_MIN: f64 = 1.0;
/// Upper edge of the piecewise-log domain.
pub const DEFAULT_LOG_DOMAIN_MAX: f64 = 300_000.0;
/// Breakpoint count for the piecewise-linear log relaxation.
pub const DEFAULT_LOG_BREAKPOINTS: usize = 50;

/// Fairness-weight multiplier η applied below the low-quality threshold.
pub const DEFAULT_LOW_QUALITY_ETA: f64 = 0.9;
/// Quality threshold Q_min below which η applies.
pub const DEFAULT_LOW_QUALITY_THRESHOLD: f64 = 0.30;

/// Maximum fraction of the normal-coin pool paid to the creator.
pub const DEFAULT_NORMAL_FRACTION_MAX: f64 = 0.75;
/// Maximum fraction of the premium-coin pool paid to the creator.
pub const DEFAULT_PREMIUM_FRACTION_MAX: f64 = 0.95;
/// Minimum premium-over-normal payout gap δ.
pub const DEFAULT_MIN_PREMIUM_GAP: f64 = 0.05;
/// Maximum premium-over-normal payout gap Δ.
pub const DEFAULT_MAX_PREMIUM_GAP: f64 = 0.35;
/// Platform revenue floor as a fraction of total coins accrued.
pub const DEFAULT_REVENUE_FLOOR_FRACTION: f64 = 0.10;

/// Weight of the platform-revenue term in the tier-split objective.
pub const DEFAULT_LAMBDA_REVENUE: f64 = 1.0;
/// Weight of the creator-utility term in the tier-split objective.
pub const DEFAULT_LAMBDA_UTILITY: f64 = 1.0;
/// Weight of the premium-adoption incentive term in the tier-split objective.
pub const DEFAULT_LAMBDA_INCENTIVE: f64 = 0.3;

/// Utility curvature θ: quality scales the marginal utility rate as (1 + θQ).
pub const DEFAULT_UTILITY_THETA: f64 = 0.8;
/// Numerical floor ε added to the utility logarithm argument.
pub const DEFAULT_UTILITY_EPSILON: f64 = 1.0;

/// Tolerance on the quality-exponent sum (must be ≈ 1).
pub const EXPONENT_SUM_TOLERANCE: f64 = 1e-6;
/// Relative tolerance on the budget equality Σp = P.
pub const BUDGET_RELATIVE_TOLERANCE: f64 = 1e-6;
/// Absolute tolerance used in feasibility pre-checks.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Default wall-clock budget for a single backend solve.
pub const DEFAULT_SOLVE_BUDGET: Duration = Duration::from_secs(10);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_exponents_sum_to_one() {
        let sum = DEFAULT_WATCH_EXPONENT
            + DEFAULT_ENGAGEMENT_EXPONENT
            + DEFAULT_DIVERSITY_EXPONENT
            + DEFAULT_REWATCH_EXPONENT
            + DEFAULT_SEMANTIC_EXPONENT;
        assert!((sum - 1.0).abs() < EXPONENT_SUM_TOLERANCE);
    }

    #[test]
    fn objective_weights_sum_to_one() {
        assert!((DEFAULT_LAMBDA_FAIR + DEFAULT_LAMBDA_EFF - 1.0).abs() < 1e-12);
    }

    #[test]
    fn log_domain_is_valid() {
        assert!(DEFAULT_LOG_DOMAIN_MIN > 0.0);
        assert!(DEFAULT_LOG_DOMAIN_MAX > DEFAULT_LOG_DOMAIN_MIN);
        assert!(DEFAULT_LOG_BREAKPOINTS >= 2);
    }

    #[test]
    fn premium_gap_bounds_ordered() {
        assert!(DEFAULT_MIN_PREMIUM_GAP >= 0.0);
        assert!(DEFAULT_MIN_PREMIUM_GAP < DEFAULT_MAX_PREMIUM_GAP);
        assert!(DEFAULT_MAX_PREMIUM_GAP < DEFAULT_PREMIUM_FRACTION_MAX);
    }

    #[test]
    fn fraction_caps_in_unit_interval() {
        assert!(DEFAULT_NORMAL_FRACTION_MAX > 0.0 && DEFAULT_NORMAL_FRACTION_MAX <= 1.0);
        assert!(DEFAULT_PREMIUM_FRACTION_MAX > 0.0 && DEFAULT_PREMIUM_FRACTION_MAX <= 1.0);
        assert!(DEFAULT_PREMIUM_FRACTION_MAX > DEFAULT_NORMAL_FRACTION_MAX);
    }

    #[test]
    fn low_quality_penalty_shrinks_weights() {
        assert!(DEFAULT_LOW_QUALITY_ETA > 0.0 && DEFAULT_LOW_QUALITY_ETA < 1.0);
        assert!(DEFAULT_LOW_QUALITY_THRESHOLD > 0.0 && DEFAULT_LOW_QUALITY_THRESHOLD < 1.0);
    }
}

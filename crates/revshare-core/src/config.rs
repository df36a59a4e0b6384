//! Externally supplied configuration for both optimization formulations.
//!
//! Every knob the engine exposes lives here and is validated before a run
//! starts; nothing is hard-coded inside the allocators.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_DIVERSITY_EXPONENT, DEFAULT_ENGAGEMENT_EXPONENT, DEFAULT_FAIRNESS_ALPHA,
    DEFAULT_LAMBDA_EFF, DEFAULT_LAMBDA_FAIR, DEFAULT_LAMBDA_INCENTIVE, DEFAULT_LAMBDA_REVENUE,
    DEFAULT_LAMBDA_UTILITY, DEFAULT_LOG_BREAKPOINTS, DEFAULT_LOG_DOMAIN_MAX,
    DEFAULT_LOG_DOMAIN_MIN, DEFAULT_LOW_QUALITY_ETA, DEFAULT_LOW_QUALITY_THRESHOLD,
    DEFAULT_MAX_PREMIUM_GAP, DEFAULT_MIN_PREMIUM_GAP, DEFAULT_NORMAL_FRACTION_MAX,
    DEFAULT_POOL_BUDGET, DEFAULT_PREMIUM_FRACTION_MAX, DEFAULT_REVENUE_FLOOR_FRACTION,
    DEFAULT_REWATCH_EXPONENT, DEFAULT_SEMANTIC_EXPONENT, DEFAULT_SOLVE_BUDGET,
    DEFAULT_UTILITY_EPSILON, DEFAULT_UTILITY_THETA, DEFAULT_WATCH_EXPONENT,
    EXPONENT_SUM_TOLERANCE,
};
use crate::error::ValidationError;

/// Sum-to-one exponents of the weighted geometric quality mean.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct QualityExponents {
    pub watch: f64,
    pub engagement: f64,
    pub diversity: f64,
    pub rewatch: f64,
    pub semantic: f64,
}

impl Default for QualityExponents {
    fn default() -> Self {
        Self {
            watch: DEFAULT_WATCH_EXPONENT,
            engagement: DEFAULT_ENGAGEMENT_EXPONENT,
            diversity: DEFAULT_DIVERSITY_EXPONENT,
            rewatch: DEFAULT_REWATCH_EXPONENT,
            semantic: DEFAULT_SEMANTIC_EXPONENT,
        }
    }
}

impl QualityExponents {
    pub fn sum(&self) -> f64 {
        self.watch + self.engagement + self.diversity + self.rewatch + self.semantic
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("watch", self.watch),
            ("engagement", self.engagement),
            ("diversity", self.diversity),
            ("rewatch", self.rewatch),
            ("semantic", self.semantic),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::BadExponent { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > EXPONENT_SUM_TOLERANCE {
            return Err(ValidationError::ExponentSum { sum });
        }
        Ok(())
    }
}

/// Domain and resolution of the piecewise-linear log relaxation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PwlSettings {
    /// Lower edge p_min of the log domain; must be strictly positive.
    pub domain_min: f64,
    /// Upper edge p_max of the log domain.
    pub domain_max: f64,
    /// Breakpoint count K.
    pub breakpoints: usize,
}

impl Default for PwlSettings {
    fn default() -> Self {
        Self {
            domain_min: DEFAULT_LOG_DOMAIN_MIN,
            domain_max: DEFAULT_LOG_DOMAIN_MAX,
            breakpoints: DEFAULT_LOG_BREAKPOINTS,
        }
    }
}

impl PwlSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.domain_min.is_finite()
            || !self.domain_max.is_finite()
            || self.domain_min <= 0.0
            || self.domain_max <= self.domain_min
        {
            return Err(ValidationError::InvalidLogDomain {
                min: self.domain_min,
                max: self.domain_max,
            });
        }
        if self.breakpoints < 2 {
            return Err(ValidationError::TooFewBreakpoints(self.breakpoints));
        }
        Ok(())
    }
}

/// Optional fairness-weight penalty for low-quality videos: weights of
/// videos with `Q < threshold` are scaled by `eta` (< 1). This is the pool
/// formulation's quality-sensitivity knob, independent of the tier-split θ.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LowQualityPenalty {
    pub eta: f64,
    pub threshold: f64,
}

impl Default for LowQualityPenalty {
    fn default() -> Self {
        Self {
            eta: DEFAULT_LOW_QUALITY_ETA,
            threshold: DEFAULT_LOW_QUALITY_THRESHOLD,
        }
    }
}

impl LowQualityPenalty {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.eta.is_finite() || self.eta <= 0.0 || self.eta > 1.0 {
            return Err(ValidationError::PenaltyOutOfRange(self.eta));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ValidationError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

/// Configuration of the pool-wide allocation formulation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolConfig {
    /// Fixed pool budget P, fully distributed each run.
    pub budget: f64,
    /// Weight λ_fair of the log-utility term.
    pub lambda_fair: f64,
    /// Weight λ_eff of the share-proportional term.
    pub lambda_eff: f64,
    /// Fairness exponent α ∈ (0, 1].
    pub alpha: f64,
    pub exponents: QualityExponents,
    pub pwl: PwlSettings,
    /// Optional low-quality fairness-weight penalty (η, Q_min).
    pub low_quality: Option<LowQualityPenalty>,
    /// Wall-clock budget for the backend solve.
    pub solve_budget: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_POOL_BUDGET,
            lambda_fair: DEFAULT_LAMBDA_FAIR,
            lambda_eff: DEFAULT_LAMBDA_EFF,
            alpha: DEFAULT_FAIRNESS_ALPHA,
            exponents: QualityExponents::default(),
            pwl: PwlSettings::default(),
            low_quality: None,
            solve_budget: DEFAULT_SOLVE_BUDGET,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget(self.budget));
        }
        for (name, value) in [("lambda_fair", self.lambda_fair), ("lambda_eff", self.lambda_eff)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::BadObjectiveWeight { name, value });
            }
        }
        if self.lambda_fair + self.lambda_eff <= 0.0 {
            return Err(ValidationError::ZeroObjectiveWeights);
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(ValidationError::AlphaOutOfRange(self.alpha));
        }
        self.exponents.validate()?;
        self.pwl.validate()?;
        if let Some(penalty) = &self.low_quality {
            penalty.validate()?;
        }
        Ok(())
    }
}

/// Configuration of the two-tier (normal/premium) split formulation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TierSplitConfig {
    /// Upper bound on the normal-coin payout fraction (x_n_max).
    pub normal_fraction_max: f64,
    /// Upper bound on the premium-coin payout fraction (x_p_max).
    pub premium_fraction_max: f64,
    /// Minimum premium-over-normal gap δ.
    pub min_gap: f64,
    /// Maximum premium-over-normal gap Δ.
    pub max_gap: f64,
    /// Platform revenue floor as a fraction of total coins.
    pub revenue_floor_fraction: f64,
    pub lambda_revenue: f64,
    pub lambda_utility: f64,
    pub lambda_incentive: f64,
    /// Utility curvature θ: marginal utility scales as (1 + θQ).
    pub theta: f64,
    /// Numerical floor ε for the utility logarithm argument.
    pub epsilon: f64,
    /// Breakpoint count for the piecewise-log fallback path.
    pub log_breakpoints: usize,
    /// Wall-clock budget for the backend solve.
    pub solve_budget: Duration,
}

impl Default for TierSplitConfig {
    fn default() -> Self {
        Self {
            normal_fraction_max: DEFAULT_NORMAL_FRACTION_MAX,
            premium_fraction_max: DEFAULT_PREMIUM_FRACTION_MAX,
            min_gap: DEFAULT_MIN_PREMIUM_GAP,
            max_gap: DEFAULT_MAX_PREMIUM_GAP,
            revenue_floor_fraction: DEFAULT_REVENUE_FLOOR_FRACTION,
            lambda_revenue: DEFAULT_LAMBDA_REVENUE,
            lambda_utility: DEFAULT_LAMBDA_UTILITY,
            lambda_incentive: DEFAULT_LAMBDA_INCENTIVE,
            theta: DEFAULT_UTILITY_THETA,
            epsilon: DEFAULT_UTILITY_EPSILON,
            log_breakpoints: DEFAULT_LOG_BREAKPOINTS,
            solve_budget: DEFAULT_SOLVE_BUDGET,
        }
    }
}

impl TierSplitConfig {
    /// Reject malformed numbers. Joint satisfiability of the gap bounds and
    /// the revenue floor is a feasibility question answered by the
    /// optimizer, not a validation one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("normal_fraction_max", self.normal_fraction_max),
            ("premium_fraction_max", self.premium_fraction_max),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ValidationError::FractionCapOutOfRange { name, value });
            }
        }
        for (name, value) in [("min_gap", self.min_gap), ("max_gap", self.max_gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::BadGapBound { name, value });
            }
        }
        if !self.revenue_floor_fraction.is_finite()
            || self.revenue_floor_fraction < 0.0
            || self.revenue_floor_fraction >= 1.0
        {
            return Err(ValidationError::RevenueFloorOutOfRange(
                self.revenue_floor_fraction,
            ));
        }
        for (name, value) in [
            ("lambda_revenue", self.lambda_revenue),
            ("lambda_utility", self.lambda_utility),
            ("lambda_incentive", self.lambda_incentive),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::BadObjectiveWeight { name, value });
            }
        }
        if self.lambda_revenue + self.lambda_utility + self.lambda_incentive <= 0.0 {
            return Err(ValidationError::ZeroObjectiveWeights);
        }
        if !self.theta.is_finite() || self.theta < 0.0 {
            return Err(ValidationError::BadTheta(self.theta));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ValidationError::BadEpsilon(self.epsilon));
        }
        if self.log_breakpoints < 2 {
            return Err(ValidationError::TooFewBreakpoints(self.log_breakpoints));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_validate() {
        assert!(PoolConfig::default().validate().is_ok());
        assert!(TierSplitConfig::default().validate().is_ok());
        assert!(QualityExponents::default().validate().is_ok());
        assert!(PwlSettings::default().validate().is_ok());
        assert!(LowQualityPenalty::default().validate().is_ok());
    }

    #[test]
    fn exponents_must_sum_to_one() {
        let mut e = QualityExponents::default();
        e.watch = 0.5;
        assert!(matches!(
            e.validate(),
            Err(ValidationError::ExponentSum { .. })
        ));
    }

    #[test]
    fn exponents_reject_negative() {
        let mut e = QualityExponents::default();
        e.rewatch = -0.1;
        e.watch += 0.2; // keep the sum at 1 so the sign check is what trips
        assert!(matches!(
            e.validate(),
            Err(ValidationError::BadExponent { name: "rewatch", .. })
        ));
    }

    #[test]
    fn pool_rejects_zero_budget() {
        let cfg = PoolConfig { budget: 0.0, ..PoolConfig::default() };
        assert_eq!(cfg.validate(), Err(ValidationError::NonPositiveBudget(0.0)));
    }

    #[test]
    fn pool_rejects_alpha_outside_unit_interval() {
        for alpha in [0.0, -0.5, 1.5] {
            let cfg = PoolConfig { alpha, ..PoolConfig::default() };
            assert!(matches!(
                cfg.validate(),
                Err(ValidationError::AlphaOutOfRange(_))
            ));
        }
    }

    #[test]
    fn pool_alpha_one_is_allowed() {
        let cfg = PoolConfig { alpha: 1.0, ..PoolConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn pwl_rejects_degenerate_domain() {
        let pwl = PwlSettings { domain_min: 5.0, domain_max: 5.0, breakpoints: 50 };
        assert!(matches!(
            pwl.validate(),
            Err(ValidationError::InvalidLogDomain { .. })
        ));
        let pwl = PwlSettings { domain_min: 0.0, domain_max: 10.0, breakpoints: 50 };
        assert!(pwl.validate().is_err());
    }

    #[test]
    fn pwl_rejects_single_breakpoint() {
        let pwl = PwlSettings { breakpoints: 1, ..PwlSettings::default() };
        assert_eq!(pwl.validate(), Err(ValidationError::TooFewBreakpoints(1)));
    }

    #[test]
    fn tier_rejects_fraction_cap_above_one() {
        let cfg = TierSplitConfig { premium_fraction_max: 1.2, ..TierSplitConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::FractionCapOutOfRange { .. })
        ));
    }

    #[test]
    fn tier_rejects_negative_gap() {
        let cfg = TierSplitConfig { min_gap: -0.01, ..TierSplitConfig::default() };
        assert!(matches!(cfg.validate(), Err(ValidationError::BadGapBound { .. })));
    }

    #[test]
    fn tier_inverted_gaps_pass_validation() {
        // δ > Δ is a feasibility failure at solve time, not a validation error.
        let cfg = TierSplitConfig { min_gap: 0.4, max_gap: 0.1, ..TierSplitConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn tier_rejects_nonpositive_epsilon() {
        let cfg = TierSplitConfig { epsilon: 0.0, ..TierSplitConfig::default() };
        assert_eq!(cfg.validate(), Err(ValidationError::BadEpsilon(0.0)));
    }

    #[test]
    fn penalty_rejects_eta_above_one() {
        let p = LowQualityPenalty { eta: 1.5, threshold: 0.3 };
        assert_eq!(p.validate(), Err(ValidationError::PenaltyOutOfRange(1.5)));
    }

    #[test]
    fn serde_roundtrip_pool_config() {
        let cfg = PoolConfig {
            low_quality: Some(LowQualityPenalty::default()),
            ..PoolConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}

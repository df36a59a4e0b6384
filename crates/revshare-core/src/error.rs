//! Error types for the revshare engine.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("pool budget must be positive, got {0}")] NonPositiveBudget(f64),
    #[error("fairness exponent alpha must be in (0, 1], got {0}")] AlphaOutOfRange(f64),
    #[error("quality exponents must sum to 1, got {sum}")] ExponentSum { sum: f64 },
    #[error("quality exponent {name} must be non-negative and finite, got {value}")] BadExponent { name: &'static str, value: f64 },
    #[error("log domain must satisfy 0 < min < max, got [{min}, {max}]")] InvalidLogDomain { min: f64, max: f64 },
    #[error("piecewise-log relaxation needs at least 2 breakpoints, got {0}")] TooFewBreakpoints(usize),
    #[error("objective weight {name} must be non-negative and finite, got {value}")] BadObjectiveWeight { name: &'static str, value: f64 },
    #[error("objective weights must not all be zero")] ZeroObjectiveWeights,
    #[error("fraction cap {name} must be in (0, 1], got {value}")] FractionCapOutOfRange { name: &'static str, value: f64 },
    #[error("premium gap bound {name} must be non-negative and finite, got {value}")] BadGapBound { name: &'static str, value: f64 },
    #[error("revenue floor fraction must be in [0, 1), got {0}")] RevenueFloorOutOfRange(f64),
    #[error("utility curvature theta must be non-negative and finite, got {0}")] BadTheta(f64),
    #[error("utility epsilon must be positive, got {0}")] BadEpsilon(f64),
    #[error("low-quality penalty eta must be in (0, 1], got {0}")] PenaltyOutOfRange(f64),
    #[error("low-quality threshold must be in [0, 1], got {0}")] ThresholdOutOfRange(f64),
    #[error("payout floor for {id} must be non-negative and finite, got {floor}")] BadPayoutFloor { id: String, floor: f64 },
    #[error("payout floor {floor} exceeds cap {cap} for {id}")] FloorAboveCap { id: String, floor: f64, cap: f64 },
    #[error("coin total {name} must be non-negative and finite, got {value}")] BadCoinTotal { name: &'static str, value: f64 },
    #[error("coin totals are both zero; nothing to split")] ZeroCoinTotals,
    #[error("quality score must be in [0, 1], got {0}")] QualityOutOfRange(f64),
    #[error("no videos supplied")] EmptyInput,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("solve exceeded its time budget")] Timeout,
    #[error("numerical failure: {0}")] Numerical(String),
    #[error("model is unbounded")] Unbounded,
    #[error("backend does not support {0} constraints")] UnsupportedConstraint(&'static str),
    #[error("invalid model: {0}")] InvalidModel(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("no eligible videos: all excluded by compliance or zero quality")] NoEligibleVideos,
    #[error("infeasible: {0}")] Infeasible(String),
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Solver(#[from] SolverError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("refusing to persist non-optimal result")] NonOptimalStatus,
    #[error("batch write failed: {0}")] WriteFailed(String),
}

#[derive(Error, Debug)]
pub enum RevshareError {
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Allocation(#[from] AllocationError),
    #[error(transparent)] Solver(#[from] SolverError),
    #[error(transparent)] Store(#[from] StoreError),
}

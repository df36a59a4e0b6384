//! Engine input and output records.
//!
//! Inputs are validated, strongly-typed snapshots; outputs are immutable
//! per-run results. The engine holds no state between runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::model::SolveStatus;

/// Opaque video/content identifier.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Raw per-video engagement signals, each nominally in [0, 1].
///
/// Out-of-range or non-finite values are clamped by the quality scorer
/// rather than rejected.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EngagementSignals {
    /// Watch-completion rate (W).
    pub watch_completion: f64,
    /// Engagement rate (E).
    pub engagement_rate: f64,
    /// Engagement diversity (D).
    pub engagement_diversity: f64,
    /// Rewatch rate (R).
    pub rewatch_rate: f64,
    /// Semantic/content-quality score (S).
    pub semantic_quality: f64,
    /// Compliance gate: `false` forces quality (and payout) to zero.
    pub compliant: bool,
}

impl EngagementSignals {
    /// Uniform signals at a single level; handy for tests and fixtures.
    pub fn uniform(level: f64, compliant: bool) -> Self {
        Self {
            watch_completion: level,
            engagement_rate: level,
            engagement_diversity: level,
            rewatch_rate: level,
            semantic_quality: level,
            compliant,
        }
    }
}

/// A video entering a pool allocation run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub views: u64,
    pub signals: EngagementSignals,
    /// Minimum payout for this video (default 0; raised to the log-domain
    /// minimum inside the allocator).
    pub payout_floor: f64,
    /// Maximum payout for this video (default +∞).
    pub payout_cap: f64,
}

impl Video {
    pub fn new(id: impl Into<VideoId>, views: u64, signals: EngagementSignals) -> Self {
        Self {
            id: id.into(),
            views,
            signals,
            payout_floor: 0.0,
            payout_cap: f64::INFINITY,
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.payout_floor = floor;
        self
    }

    pub fn with_cap(mut self, cap: f64) -> Self {
        self.payout_cap = cap;
        self
    }

    /// Structural validation of floor/cap; signal ranges are handled by
    /// clamping in the scorer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.payout_floor.is_finite() || self.payout_floor < 0.0 {
            return Err(ValidationError::BadPayoutFloor {
                id: self.id.to_string(),
                floor: self.payout_floor,
            });
        }
        if self.payout_cap < self.payout_floor {
            return Err(ValidationError::FloorAboveCap {
                id: self.id.to_string(),
                floor: self.payout_floor,
                cap: self.payout_cap,
            });
        }
        Ok(())
    }
}

/// Derived per-video quantities feeding the pool objective.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VideoShare {
    pub id: VideoId,
    /// Bounded quality score Q ∈ [0, 1]; 0 when non-compliant.
    pub quality: f64,
    /// Quality-weighted volume M = views · Q (0 when non-compliant).
    pub weighted_volume: f64,
    /// Normalized market share s = M / ΣM; sums to 1 over eligible videos.
    pub share: f64,
    /// Fairness weight w = s^α, optionally scaled by the low-quality penalty.
    pub weight: f64,
    pub compliant: bool,
}

/// Single-video input to the tier-split optimizer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TierSplitRequest {
    pub id: VideoId,
    /// Total normal coins accrued (N_n).
    pub normal_coins: f64,
    /// Total premium coins accrued (N_p).
    pub premium_coins: f64,
    /// Quality score Q ∈ [0, 1].
    pub quality: f64,
}

impl TierSplitRequest {
    pub fn new(id: impl Into<VideoId>, normal_coins: f64, premium_coins: f64, quality: f64) -> Self {
        Self {
            id: id.into(),
            normal_coins,
            premium_coins,
            quality,
        }
    }

    pub fn total_coins(&self) -> f64 {
        self.normal_coins + self.premium_coins
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.normal_coins.is_finite() || self.normal_coins < 0.0 {
            return Err(ValidationError::BadCoinTotal {
                name: "normal_coins",
                value: self.normal_coins,
            });
        }
        if !self.premium_coins.is_finite() || self.premium_coins < 0.0 {
            return Err(ValidationError::BadCoinTotal {
                name: "premium_coins",
                value: self.premium_coins,
            });
        }
        if self.total_coins() <= 0.0 {
            return Err(ValidationError::ZeroCoinTotals);
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(ValidationError::QualityOutOfRange(self.quality));
        }
        Ok(())
    }
}

/// One video's payout in a pool allocation result.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolPayout {
    pub id: VideoId,
    /// Absolute payout p in pool units.
    pub payout: f64,
    /// Normalized proportion p / P ∈ [0, 1].
    pub proportion: f64,
}

/// Immutable result of one pool allocation run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolOutcome {
    pub payouts: Vec<PoolPayout>,
    pub objective: f64,
    pub status: SolveStatus,
}

impl PoolOutcome {
    /// Total payout distributed; equals the pool budget when optimal.
    pub fn total_payout(&self) -> f64 {
        self.payouts.iter().map(|p| p.payout).sum()
    }

    pub fn payout_for(&self, id: &VideoId) -> Option<&PoolPayout> {
        self.payouts.iter().find(|p| &p.id == id)
    }
}

/// Immutable result of one tier-split run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TierSplitOutcome {
    pub id: VideoId,
    /// Fraction of the normal-coin pool paid to the creator (x_n).
    pub normal_fraction: f64,
    /// Fraction of the premium-coin pool paid to the creator (x_p).
    pub premium_fraction: f64,
    /// Coins paid to the creator: x_n·N_n + x_p·N_p.
    pub creator_payout: f64,
    /// Coins retained by the platform: (1−x_n)·N_n + (1−x_p)·N_p.
    pub retained_revenue: f64,
    pub objective: f64,
    pub status: SolveStatus,
}

impl TierSplitOutcome {
    /// The premium-over-normal payout gap x_p − x_n.
    pub fn premium_gap(&self) -> f64 {
        self.premium_fraction - self.normal_fraction
    }
}

//! Quality scoring: conjunctive aggregation of engagement signals.

use revshare_core::config::QualityExponents;
use revshare_core::error::ValidationError;
use revshare_core::types::EngagementSignals;

/// Clamp a raw signal into [0, 1]; non-finite values collapse to 0.
fn clamp_signal(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// Computes the bounded quality score
/// `Q = C · min(1, W^φW · E^φE · D^φD · R^φR · S^φS)`.
///
/// The geometric mean is conjunctive: any single signal at zero collapses
/// the whole score, so a video cannot average away a total failure in one
/// quality dimension. Compliance is a hard gate, not a penalty.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    exponents: QualityExponents,
}

impl QualityScorer {
    /// Build a scorer from validated exponents (must sum to ≈ 1).
    pub fn new(exponents: QualityExponents) -> Result<Self, ValidationError> {
        exponents.validate()?;
        Ok(Self { exponents })
    }

    pub fn exponents(&self) -> &QualityExponents {
        &self.exponents
    }

    /// Score one video's signals. Out-of-range inputs are clamped into
    /// [0, 1] rather than rejected; the result is always in [0, 1].
    pub fn score(&self, signals: &EngagementSignals) -> f64 {
        if !signals.compliant {
            return 0.0;
        }
        let e = &self.exponents;
        let q = clamp_signal(signals.watch_completion).powf(e.watch)
            * clamp_signal(signals.engagement_rate).powf(e.engagement)
            * clamp_signal(signals.engagement_diversity).powf(e.diversity)
            * clamp_signal(signals.rewatch_rate).powf(e.rewatch)
            * clamp_signal(signals.semantic_quality).powf(e.semantic);
        q.min(1.0)
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self {
            exponents: QualityExponents::default(),
        }
    }
}

//! Market-share and fairness-weight derivation.

use tracing::debug;

use revshare_core::config::LowQualityPenalty;
use revshare_core::error::{AllocationError, ValidationError};
use revshare_core::types::{Video, VideoShare};

use crate::quality::QualityScorer;

/// Derive normalized shares and fairness weights for a pool snapshot.
///
/// For each video: `M = views · Q` if compliant else 0, `s = M / ΣM`, and
/// `w = s^α` with `α ∈ (0, 1]`. The concave exponent compresses large shares
/// toward parity — smaller α pushes the pool toward an equal split, α = 1
/// recovers pure proportionality. When a low-quality penalty is configured,
/// weights of videos below the quality threshold are scaled by η.
///
/// Fails with [`AllocationError::NoEligibleVideos`] when every video is
/// non-compliant or zero-quality (ΣM = 0): no allocation is meaningful.
pub fn derive_shares(
    videos: &[Video],
    scorer: &QualityScorer,
    alpha: f64,
    penalty: Option<&LowQualityPenalty>,
) -> Result<Vec<VideoShare>, AllocationError> {
    if videos.is_empty() {
        return Err(ValidationError::EmptyInput.into());
    }
    if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
        return Err(ValidationError::AlphaOutOfRange(alpha).into());
    }

    let qualities: Vec<f64> = videos.iter().map(|v| scorer.score(&v.signals)).collect();
    let volumes: Vec<f64> = videos
        .iter()
        .zip(&qualities)
        .map(|(v, &q)| if v.signals.compliant { v.views as f64 * q } else { 0.0 })
        .collect();

    let total: f64 = volumes.iter().sum();
    if total <= 0.0 {
        return Err(AllocationError::NoEligibleVideos);
    }

    let shares = videos
        .iter()
        .zip(&qualities)
        .zip(&volumes)
        .map(|((video, &quality), &volume)| {
            let share = volume / total;
            let mut weight = if share > 0.0 { share.powf(alpha) } else { 0.0 };
            if let Some(p) = penalty {
                if quality < p.threshold {
                    weight *= p.eta;
                }
            }
            VideoShare {
                id: video.id.clone(),
                quality,
                weighted_volume: volume,
                share,
                weight,
                compliant: video.signals.compliant,
            }
        })
        .collect();

    debug!(videos = videos.len(), total_volume = total, "derived pool shares");
    Ok(shares)
}

//! Piecewise-linear relaxation of the natural logarithm.
//!
//! Breakpoints are geometrically spaced so the relative approximation error
//! stays roughly uniform across the domain — payouts span several orders of
//! magnitude, and uniform spacing would waste resolution at the top end.

use revshare_core::error::ValidationError;

/// A reusable piecewise-linear under-approximation of `ln` over
/// `[domain_min, domain_max]`.
///
/// Consumed as a generalized constraint by solvers lacking native logarithm
/// support; bypassed entirely when the backend handles `ln` natively. Any
/// variable tied to the curve must have a lower bound at or above
/// `domain_min` — values below the domain are structurally excluded by the
/// allocators, never silently evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct LogCurve {
    points: Vec<(f64, f64)>,
}

impl LogCurve {
    /// Build `k` geometrically spaced breakpoints
    /// `x_i = min · (max/min)^(i/(k-1))` with ordinates `ln(x_i)`.
    pub fn geometric(domain_min: f64, domain_max: f64, k: usize) -> Result<Self, ValidationError> {
        if !domain_min.is_finite()
            || !domain_max.is_finite()
            || domain_min <= 0.0
            || domain_max <= domain_min
        {
            return Err(ValidationError::InvalidLogDomain {
                min: domain_min,
                max: domain_max,
            });
        }
        if k < 2 {
            return Err(ValidationError::TooFewBreakpoints(k));
        }

        let ratio = domain_max / domain_min;
        let points = (0..k)
            .map(|i| {
                let x = domain_min * ratio.powf(i as f64 / (k - 1) as f64);
                (x, x.ln())
            })
            .collect();
        Ok(Self { points })
    }

    /// Breakpoints `(x_i, ln x_i)` in increasing order of `x`.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// `(domain_min, domain_max)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }

    /// Evaluate the chord interpolation at `x` (clamped to the domain).
    /// Used for validation; the solver applies the same relation as a
    /// generalized constraint.
    pub fn interpolate(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain();
        let x = x.clamp(lo, hi);
        // Binary search for the segment containing x.
        let idx = self
            .points
            .partition_point(|&(bx, _)| bx <= x)
            .saturating_sub(1)
            .min(self.points.len() - 2);
        let (x0, y0) = self.points[idx];
        let (x1, y1) = self.points[idx + 1];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

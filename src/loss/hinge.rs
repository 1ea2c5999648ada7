//! Hinge-family losses

use crate::loss::Loss;

/// Classic hinge loss: `max(0, 1 - z)` with `z = s * y`.
///
/// Examples scored beyond the margin contribute nothing, so most updates on
/// a well-trained model are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HingeLoss;

impl Loss for HingeLoss {
    fn loss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        1.0 - z
    }

    fn dloss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        y
    }

    fn name(&self) -> &'static str {
        "hinge"
    }
}

/// Squared hinge loss: `0.5 * (1 - z)^2` inside the margin, 0 beyond it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredHingeLoss;

impl Loss for SquaredHingeLoss {
    fn loss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        let d = 1.0 - z;
        0.5 * d * d
    }

    fn dloss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        y * (1.0 - z)
    }

    fn name(&self) -> &'static str {
        "squared_hinge"
    }
}

/// Smoothed hinge: quadratic for `0 <= z <= 1`, linear (`0.5 - z`) for
/// `z < 0`, 0 beyond the margin. Continuous first derivative everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothHingeLoss;

impl Loss for SmoothHingeLoss {
    fn loss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        if z < 0.0 {
            return 0.5 - z;
        }
        let d = 1.0 - z;
        0.5 * d * d
    }

    fn dloss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 1.0 {
            return 0.0;
        }
        if z < 0.0 {
            return y;
        }
        y * (1.0 - z)
    }

    fn name(&self) -> &'static str {
        "smooth_hinge"
    }
}

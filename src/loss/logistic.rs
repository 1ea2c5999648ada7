//! Logistic loss

use crate::loss::Loss;

/// Logistic (log) loss: `ln(1 + e^-z)` with `z = s * y`.
///
/// Guarded against overflow: for `z > 18` the loss collapses to `e^-z` and
/// for `z < -18` to `-z`, both accurate to double precision in those ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl Loss for LogLoss {
    fn loss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 18.0 {
            return (-z).exp();
        }
        if z < -18.0 {
            return -z;
        }
        (1.0 + (-z).exp()).ln()
    }

    fn dloss(&self, s: f64, y: f64) -> f64 {
        let z = s * y;
        if z > 18.0 {
            return y * (-z).exp();
        }
        if z < -18.0 {
            return y;
        }
        y / (1.0 + z.exp())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// ==============================================================================
// curve.rs — PIECEWISE-LINEAR LOOKUP TABLE
// ==============================================================================
// Backs the engine torque-vs-rpm map. Samples are (x, y) pairs sorted by
// ascending x; queries outside the sampled range clamp to the end samples,
// and a query landing exactly on a sample returns that sample's y rather
// than an interpolation (inclusive boundaries on both ends).
// ==============================================================================

/// Immutable piecewise-linear curve over ordered (x, y) samples.
#[derive(Debug, Clone, Default)]
pub struct CurveTable {
    samples: Vec<(f32, f32)>,
}

impl CurveTable {
    /// The caller is responsible for sample order; descriptions are checked
    /// once at validation time.
    pub fn from_samples(samples: Vec<(f32, f32)>) -> Self {
        Self { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated lookup with flat extrapolation outside the sample range.
    /// An empty table evaluates to 0 everywhere.
    pub fn evaluate(&self, x: f32) -> f32 {
        let Some(&(first_x, first_y)) = self.samples.first() else {
            return 0.0;
        };
        if x <= first_x {
            return first_y;
        }
        let &(last_x, last_y) = self.samples.last().expect("non-empty");
        if x >= last_x {
            return last_y;
        }

        // First sample past the query. A linear scan is fine at these table
        // sizes (~20 entries at most).
        let i = self
            .samples
            .iter()
            .position(|&(sample_x, _)| sample_x > x)
            .expect("x is below the last sample");
        let (x0, y0) = self.samples[i - 1];
        let (x1, y1) = self.samples[i];
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}

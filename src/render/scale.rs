use crate::config::PlotConfig;
use crate::graph::Network;

/// Maps arc weights linearly onto `[min_width, max_width]`.
#[derive(Clone, Copy, Debug)]
pub struct WidthScale {
    min_weight: f64,
    max_weight: f64,
    min_width: f64,
    max_width: f64,
}

impl WidthScale {
    pub fn new(min_weight: f64, max_weight: f64, min_width: f64, max_width: f64) -> Self {
        Self {
            min_weight,
            max_weight,
            min_width,
            max_width,
        }
    }

    /// Scale spanning every arc weight of `network`, `None` if it has no arcs.
    pub fn for_network<V>(network: &Network<V>, config: &PlotConfig) -> Option<Self> {
        network
            .weight_range()
            .map(|(lo, hi)| Self::new(lo, hi, config.min_line_width, config.max_line_width))
    }

    /// Position of `weight` within the weight range, `0.0` when every weight
    /// is the same.
    pub fn fraction(&self, weight: f64) -> f64 {
        let range = self.max_weight - self.min_weight;
        if range == 0.0 {
            return 0.0;
        }
        (weight - self.min_weight) / range
    }

    pub fn width(&self, weight: f64) -> f64 {
        self.fraction(weight) * (self.max_width - self.min_width) + self.min_width
    }
}

//! FPS histogram over fixed baskets
//!
//! Each frame delta is converted to an instantaneous rate (`1e6 / Δt`) and
//! lands in exactly one basket. Baskets are non-uniform: narrow around the
//! common 60/30/20 FPS rates, wide at the extremes.

#![allow(clippy::cast_precision_loss)]

use std::fmt;

use super::FrameDelta;

/// Lower bounds of the baskets in FPS, highest first. The last bound is 0,
/// so every delta has a basket.
pub const BASKET_LOWER_BOUNDS: [f64; 14] =
    [70.0, 50.0, 35.0, 26.0, 22.0, 19.0, 16.0, 13.0, 11.0, 9.0, 7.0, 5.0, 3.0, 0.0];

/// Whether bars show frame counts or time spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramMode {
    #[default]
    Count,
    Time,
}

impl HistogramMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Count => Self::Time,
            Self::Time => Self::Count,
        }
    }
}

impl fmt::Display for HistogramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => f.write_str("count"),
            Self::Time => f.write_str("time"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Basket {
    pub count: usize,
    /// Sum of the deltas in this basket, microseconds.
    pub time: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FpsHistogram {
    pub baskets: [Basket; BASKET_LOWER_BOUNDS.len()],
}

impl FpsHistogram {
    #[must_use]
    pub fn from_deltas(deltas: &[FrameDelta]) -> Self {
        let mut histogram = Self::default();
        for delta in deltas {
            histogram.record(delta.delta);
        }
        histogram
    }

    /// Add one frame delta.
    pub fn record(&mut self, delta_us: u64) {
        let index = basket_index(delta_us);
        self.baskets[index].count += 1;
        self.baskets[index].time += delta_us;
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.baskets.iter().map(|b| b.count).sum()
    }

    #[must_use]
    pub fn total_time(&self) -> u64 {
        self.baskets.iter().map(|b| b.time).sum()
    }

    /// Basket value for `mode`: frame count, or time in microseconds.
    #[must_use]
    pub fn value(&self, index: usize, mode: HistogramMode) -> f64 {
        let basket = &self.baskets[index];
        match mode {
            HistogramMode::Count => basket.count as f64,
            HistogramMode::Time => basket.time as f64,
        }
    }

    /// Share of the total for each basket in `mode`, percent.
    #[must_use]
    pub fn percentages(&self, mode: HistogramMode) -> Vec<f64> {
        let total: f64 = (0..self.baskets.len()).map(|i| self.value(i, mode)).sum();
        (0..self.baskets.len())
            .map(|i| if total > 0.0 { 100.0 * self.value(i, mode) / total } else { 0.0 })
            .collect()
    }

    /// Tooltip for one basket bar.
    #[must_use]
    pub fn tooltip(&self, index: usize, mode: HistogramMode) -> String {
        let percent = self.percentages(mode)[index];
        let basket = &self.baskets[index];
        match mode {
            HistogramMode::Count => format!(
                "{} FPS\n{} frames, {percent:.1}%",
                basket_label(index),
                basket.count
            ),
            HistogramMode::Time => format!(
                "{} FPS\n{:.1} ms, {percent:.1}%",
                basket_label(index),
                basket.time as f64 / 1000.0
            ),
        }
    }
}

/// Basket for a delta. A zero delta is an unbounded rate and goes to the
/// top basket.
#[must_use]
pub fn basket_index(delta_us: u64) -> usize {
    if delta_us == 0 {
        return 0;
    }
    let fps = 1_000_000.0 / delta_us as f64;
    BASKET_LOWER_BOUNDS
        .iter()
        .position(|&lower| fps >= lower)
        .unwrap_or(BASKET_LOWER_BOUNDS.len() - 1)
}

/// Range label, e.g. `70+` or `50-70`.
#[must_use]
pub fn basket_label(index: usize) -> String {
    match index {
        0 => format!("{}+", BASKET_LOWER_BOUNDS[0]),
        i => format!("{}-{}", BASKET_LOWER_BOUNDS[i], BASKET_LOWER_BOUNDS[i - 1]),
    }
}

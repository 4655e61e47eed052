//! Render quality and jitter
//!
//! Both metrics need a spread of samples; with fewer than
//! [`MIN_QUALITY_SAMPLES`] deltas they report 0, which callers read as
//! "not enough data" rather than as a measured value.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

/// Fewest deltas for which quality and jitter are computed.
pub const MIN_QUALITY_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderQuality {
    /// 100 × p10 / p90 of the deltas, in `[0, 100]`. Higher is steadier.
    pub quality: f64,
    /// RMS deviation from the nearest frame boundary, microseconds.
    pub jitter: f64,
}

/// Timing class of one frame against the target frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTiming {
    /// Closest to one frame interval.
    OnTime = 0,
    /// Closest to two intervals: one vsync missed.
    Late = 1,
    /// Three or more intervals.
    Janky = 2,
}

impl FrameTiming {
    /// Classify a delta by its nearest frame-interval multiple.
    #[must_use]
    pub fn classify(delta: u64, target_frame_time: u64) -> Self {
        match nearest_multiple(delta, target_frame_time) {
            0 | 1 => Self::OnTime,
            2 => Self::Late,
            _ => Self::Janky,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OnTime => "on time",
            Self::Late => "late",
            Self::Janky => "janky",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::OnTime => "#65f441",
            Self::Late => "#ffbf00",
            Self::Janky => "#ff3d00",
        }
    }
}

/// Nearest multiple of `target` to `delta`, never below 1.
fn nearest_multiple(delta: u64, target: u64) -> u64 {
    if target == 0 {
        return 1;
    }
    ((delta as f64 / target as f64).round() as u64).max(1)
}

/// Quality and jitter of a set of frame deltas.
///
/// Depends only on the multiset of deltas, not their order.
#[must_use]
pub fn render_quality(deltas: &[u64], target_frame_time: u64) -> RenderQuality {
    let n = deltas.len();
    if n < MIN_QUALITY_SAMPLES {
        return RenderQuality::default();
    }

    let mut sum_sq = 0.0;
    for &delta in deltas {
        let boundary = nearest_multiple(delta, target_frame_time) * target_frame_time;
        let deviation = delta as f64 - boundary as f64;
        sum_sq += deviation * deviation;
    }
    let jitter = (sum_sq / n as f64).sqrt();

    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();
    let p10 = sorted[((n as f64 * 0.1) as usize).min(n - 1)];
    let p90 = sorted[((n as f64 * 0.9) as usize).min(n - 1)];
    let quality = if p90 == 0 { 0.0 } else { 100.0 * p10 as f64 / p90 as f64 };

    RenderQuality { quality, jitter }
}

/// Per-frame timing classes, one per delta, keyed by the frame timestamp.
#[must_use]
pub fn frame_timing_classes(
    deltas: &[super::FrameDelta],
    target_frame_time: u64,
) -> Vec<(u64, FrameTiming)> {
    deltas
        .iter()
        .map(|d| (d.timestamp, FrameTiming::classify(d.delta, target_frame_time)))
        .collect()
}

//! Frame capture helpers
//!
//! Paced sampling of a frame source, for building short animated previews
//! of a trace view. Pacing is a fixed interval measured from the start of
//! each capture, so a slow frame shortens the following sleep instead of
//! drifting the whole sequence.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::domain::CaptureError;

/// Validated capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureParams {
    num_frames: usize,
    interval: Duration,
}

impl CaptureParams {
    /// # Errors
    /// Returns an error if `num_frames` or `interval_ms` is not positive.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn new(num_frames: i64, interval_ms: i64) -> Result<Self, CaptureError> {
        if num_frames <= 0 {
            return Err(CaptureError::InvalidFrameCount(num_frames));
        }
        if interval_ms <= 0 {
            return Err(CaptureError::InvalidInterval(interval_ms));
        }
        Ok(Self {
            num_frames: num_frames as usize,
            interval: Duration::from_millis(interval_ms as u64),
        })
    }

    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Capture `params.num_frames()` frames from `source`, one per interval.
///
/// `source` receives the frame index. No sleep follows the last frame.
///
/// # Errors
/// Returns [`CaptureError::FrameFailed`] for the first frame the source
/// fails to produce; frames captured so far are dropped.
pub fn capture_frames<T, F>(params: CaptureParams, mut source: F) -> Result<Vec<T>, CaptureError>
where
    F: FnMut(usize) -> Result<T, String>,
{
    let mut frames = Vec::with_capacity(params.num_frames);
    for index in 0..params.num_frames {
        let started = Instant::now();
        let frame = source(index).map_err(|reason| CaptureError::FrameFailed { index, reason })?;
        frames.push(frame);

        if index + 1 < params.num_frames {
            let remaining = params.interval.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                debug!("Frame {index} overran the {:?} capture interval", params.interval);
            }
            thread::sleep(remaining);
        }
    }
    info!("Captured {} frames at {:?} intervals", frames.len(), params.interval);
    Ok(frames)
}

/// Extend a sequence into a palindromic loop: forward, then back without
/// repeating either end.
///
/// `[a, b, c]` becomes `[a, b, c, b]`; sequences shorter than three are
/// returned unchanged.
#[must_use]
pub fn mirror<T: Clone>(items: &[T]) -> Vec<T> {
    let mut looped = items.to_vec();
    if items.len() > 2 {
        looped.extend(items[1..items.len() - 1].iter().rev().cloned());
    }
    looped
}

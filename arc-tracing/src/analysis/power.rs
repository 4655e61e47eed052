//! Average power from counter samples

#![allow(clippy::cast_precision_loss)]

use log::debug;

use crate::series::EventSeries;

/// Returned by [`average_power`] when there is nothing to integrate.
pub const NO_POWER_DATA: f64 = -1.0;

/// Average power in watts of a milliwatt sample series.
///
/// Each sample holds from the previous sample (or the trace start) up to
/// its own timestamp. Energy is divided by the timestamp of the last
/// sample. Returns [`NO_POWER_DATA`] when the series is empty or the last
/// sample sits at time 0.
#[must_use]
pub fn average_power(series: &EventSeries) -> f64 {
    let mut energy = 0.0;
    let mut previous = 0u64;
    let mut samples = 0usize;
    for event in series.iter() {
        let value = event.number().unwrap_or(0.0);
        energy += value * event.timestamp.saturating_sub(previous) as f64;
        previous = event.timestamp;
        samples += 1;
    }
    if samples == 0 || previous == 0 {
        debug!("No power samples to integrate ({samples} samples)");
        return NO_POWER_DATA;
    }
    energy * 0.001 / previous as f64
}

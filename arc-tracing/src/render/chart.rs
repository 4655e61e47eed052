//! Value charts inside an [`EventBands`] layout
//!
//! A chart is a row range plus the sources drawn into it. Sources keep the
//! value bounds they were drawn with so the tooltip can map the cursor back
//! to a value.

#![allow(clippy::cast_precision_loss)]

use log::debug;

use crate::attributes::{value_attributes, BarPalette, ChartAttributes, UNUSED_COLOR};
use crate::render::bands::EventBands;
use crate::render::surface::DrawingSurface;
use crate::series::{Direction, EventSeries};

/// Drawn source and what the tooltip needs to read it back.
#[derive(Debug, Clone)]
pub enum ChartSource {
    /// Polyline of sampled values.
    Continuous {
        source: EventSeries,
        attributes: ChartAttributes,
        min_value: f64,
        max_value: f64,
        smooth: bool,
    },
    /// Bars colored by discrete value.
    PerValue { source: EventSeries, palette: BarPalette },
}

#[derive(Debug, Clone)]
pub struct Chart {
    pub top: f64,
    pub bottom: f64,
    pub sources: Vec<ChartSource>,
}

impl Chart {
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom, sources: Vec::new() }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

fn sample(source: &EventSeries, index: usize) -> f64 {
    source.event(index).number().unwrap_or(0.0)
}

impl EventBands {
    /// Draw `sources` into the last chart, one polyline each.
    ///
    /// Without `attributes`, or with attributes lacking a fixed range, the
    /// value range is detected over every source inside the window, widened
    /// to at least `min_range / scale` and padded by 1% on both sides.
    /// `smooth` draws straight segments between samples; otherwise each
    /// value holds until the next sample. Nothing is drawn when no source
    /// has a sample inside the window, or when there is no chart yet.
    pub fn add_chart_sources(
        &mut self,
        sources: &[EventSeries],
        smooth: bool,
        attributes: Option<&ChartAttributes>,
    ) {
        if self.charts.is_empty() {
            debug!("Chart sources added before any chart");
            return;
        }
        let auto_range = attributes.map_or(true, ChartAttributes::auto_range);
        let mut attributes = attributes.cloned();
        let mut range: Option<(f64, f64)> = None;

        let mut indices_per_source = Vec::with_capacity(sources.len());
        for source in sources {
            let mut indices = Vec::new();
            let mut index = source.first_after(self.min_timestamp);
            while let Some(i) = index {
                if source.event(i).timestamp > self.max_timestamp {
                    break;
                }
                indices.push(i);
                if auto_range {
                    let value = sample(source, i);
                    range = Some(match range {
                        None => (value, value),
                        Some((min, max)) => (min.min(value), max.max(value)),
                    });
                }
                if attributes.is_none() {
                    attributes = value_attributes(source.event(i).kind);
                }
                index = source.next_event(i, Direction::Forward);
            }
            indices_per_source.push(indices);
        }

        if indices_per_source.iter().all(Vec::is_empty) {
            return;
        }
        let attributes = attributes.unwrap_or_else(|| ChartAttributes::auto(UNUSED_COLOR, "value"));

        let (min_value, max_value) = if auto_range {
            let (min, mut max) = range.unwrap_or((0.0, 0.0));
            if attributes.scale > 0.0 && max - min < attributes.min_range / attributes.scale {
                max = min + attributes.min_range / attributes.scale;
            }
            if max <= min {
                // Flat data with no minimum range.
                max = min + 1.0;
            }
            let dif = max - min;
            (min - dif * 0.01, max + dif * 0.01)
        } else {
            (
                attributes.min_value.unwrap_or(0.0),
                attributes.max_value.unwrap_or(1.0),
            )
        };
        let divider = 1.0 / (max_value - min_value);

        let Some(chart) = self.charts.last() else {
            return;
        };
        let (top, height) = (chart.top, chart.height());

        let mut drawn = Vec::new();
        for (source, indices) in sources.iter().zip(&indices_per_source) {
            if indices.is_empty() {
                continue;
            }
            let mut points = Vec::with_capacity(indices.len() * 2);
            let mut last_y = 0.0;
            for (j, &i) in indices.iter().enumerate() {
                let x = self.timestamp_to_offset(source.event(i).timestamp as f64)
                    + self.band_offset_x;
                let y = top + height * (max_value - sample(source, i)) * divider;
                if !smooth && j != 0 {
                    points.push((x, last_y));
                }
                points.push((x, y));
                last_y = y;
            }
            self.draw.add_polyline(points, &attributes.color, attributes.width);
            drawn.push(ChartSource::Continuous {
                source: source.clone(),
                attributes: attributes.clone(),
                min_value,
                max_value,
                smooth,
            });
        }

        if let Some(chart) = self.charts.last_mut() {
            chart.sources.extend(drawn);
        }
    }

    /// Draw `source` into the last chart as bars colored by value.
    ///
    /// Each bar spans from its sample to the next one, or to the end of the
    /// window for the last sample.
    pub fn add_bar_source(&mut self, source: EventSeries, palette: BarPalette, y: f64, height: f64) {
        if self.charts.is_empty() {
            return;
        }
        let mut index = source.first_after(self.min_timestamp);
        while let Some(i) = index {
            let event = source.event(i);
            if event.timestamp > self.max_timestamp {
                break;
            }
            let next = source.next_event(i, Direction::Forward);
            let next_timestamp = next
                .map(|n| source.event(n).timestamp)
                .filter(|&t| t <= self.max_timestamp)
                .unwrap_or(self.max_timestamp);
            let x = self.timestamp_to_offset(event.timestamp as f64) + self.band_offset_x;
            let next_x = self.timestamp_to_offset(next_timestamp as f64) + self.band_offset_x;
            let color = palette
                .get(event.number().unwrap_or(0.0))
                .map_or(UNUSED_COLOR, |a| a.color);
            self.draw.add_rect(x, y, next_x - x, height, color, Some(1.0));
            index = next;
        }
        if let Some(chart) = self.charts.last_mut() {
            chart.sources.push(ChartSource::PerValue { source, palette });
        }
    }
}

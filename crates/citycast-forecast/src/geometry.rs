//! Chart geometry engine: normalized days in, drawable numbers out.
//!
//! Nothing here draws. The output is an inert bundle of scales, pixel
//! coordinates, curve paths and ticks that a renderer turns into SVG or
//! canvas calls, replacing whatever it drew for the previous call.

use citycast_core::{ChartConfig, ForecastError};
use serde::Serialize;

use crate::curve::{monotone_band, monotone_line, CurvePath, PlotPoint};
use crate::labels::{short_date, tick_label};
use crate::scale::LinearScale;
use crate::types::{ChartPoint, NormalizedDay};

/// Headroom above the warmest and below the coldest reading
pub const TEMPERATURE_PAD: f64 = 5.0;

pub const TEMPERATURE_TICK_COUNT: usize = 5;

/// Drawable area inside the chart margins. Both sides are positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotArea {
    width: f64,
    height: f64,
}

impl PlotArea {
    /// # Errors
    ///
    /// `ForecastError::InvalidPlotArea` when either side is zero, negative or not finite.
    pub fn new(width: f64, height: f64) -> Result<Self, ForecastError> {
        let valid = |side: f64| side.is_finite() && side > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(ForecastError::InvalidPlotArea { width, height })
        }
    }

    /// Plot area for a container of the given width under a chart layout.
    ///
    /// # Errors
    ///
    /// `ForecastError::InvalidPlotArea` when the margins leave no room.
    pub fn from_layout(chart: &ChartConfig, container_width: f64) -> Result<Self, ForecastError> {
        let (width, height) = chart.plot_size(container_width);
        Self::new(width, height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Axis tick: domain value, pixel position along its axis, and label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    /// Day index -> x pixel
    pub x_scale: LinearScale,
    /// Temperature -> y pixel (inverted)
    pub y_scale: LinearScale,
    pub points: Vec<ChartPoint>,
    pub max_points: Vec<PlotPoint>,
    pub min_points: Vec<PlotPoint>,
    pub max_line: CurvePath,
    pub min_line: CurvePath,
    /// Filled region between the max and min curves
    pub band: CurvePath,
    pub temperature_ticks: Vec<Tick>,
    pub day_ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeometryOutcome {
    Chart(ChartGeometry),
    Empty,
}

impl GeometryOutcome {
    pub fn into_chart(self) -> Option<ChartGeometry> {
        match self {
            Self::Chart(geometry) => Some(geometry),
            Self::Empty => None,
        }
    }
}

pub fn build_geometry(days: &[NormalizedDay], plot: PlotArea) -> GeometryOutcome {
    let Some(last_index) = days.len().checked_sub(1) else {
        return GeometryOutcome::Empty;
    };

    let points: Vec<ChartPoint> = days
        .iter()
        .enumerate()
        .map(|(index, day)| ChartPoint::from_day(index, day))
        .collect();

    let (coldest, warmest) = points
        .iter()
        .flat_map(|p| [p.temp_max, p.temp_min])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });

    let x_scale = LinearScale::new([0.0, last_index as f64], [0.0, plot.width]);
    let y_scale = LinearScale::new(
        [coldest - TEMPERATURE_PAD, warmest + TEMPERATURE_PAD],
        [plot.height, 0.0],
    );

    let project = |temperature: fn(&ChartPoint) -> f64| -> Vec<PlotPoint> {
        points
            .iter()
            .map(|p| PlotPoint::new(x_scale.apply(p.index as f64), y_scale.apply(temperature(p))))
            .collect()
    };
    let max_points = project(|p| p.temp_max);
    let min_points = project(|p| p.temp_min);

    let temperature_ticks = y_scale
        .ticks(TEMPERATURE_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            position: y_scale.apply(value),
            label: tick_label(value),
        })
        .collect();

    let day_ticks = points
        .iter()
        .zip(days)
        .map(|(point, day)| {
            let value = point.index as f64;
            Tick {
                value,
                position: x_scale.apply(value),
                label: short_date(&day.date),
            }
        })
        .collect();

    tracing::debug!(
        days = points.len(),
        domain_min = y_scale.domain[0],
        domain_max = y_scale.domain[1],
        "Built chart geometry"
    );

    GeometryOutcome::Chart(ChartGeometry {
        x_scale,
        y_scale,
        max_line: monotone_line(&max_points),
        min_line: monotone_line(&min_points),
        band: monotone_band(&max_points, &min_points),
        points,
        max_points,
        min_points,
        temperature_ticks,
        day_ticks,
    })
}

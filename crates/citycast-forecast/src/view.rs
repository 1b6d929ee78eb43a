//! Whole forecast panel for one city: normalize, then chart and summarize.

use citycast_core::Config;
use serde::Serialize;
use serde_json::Value;

use crate::geometry::{build_geometry, ChartGeometry, PlotArea};
use crate::normalize::{normalize_with, NormalizeOptions};
use crate::summary::{summarize, DayCard, SummaryOptions};
use crate::types::{NormalizeOutcome, NormalizedDay};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastView {
    /// No payload, or nothing usable in it
    Unavailable,
    /// Upstream reported an error; `message` is shown as-is
    Failed { message: String },
    Ready(ForecastPanel),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPanel {
    pub days: Vec<NormalizedDay>,
    /// `None` when the container is too small to hold a plot
    pub chart: Option<ChartGeometry>,
    pub cards: Vec<DayCard>,
}

impl ForecastView {
    pub fn panel(&self) -> Option<&ForecastPanel> {
        match self {
            Self::Ready(panel) => Some(panel),
            Self::Unavailable | Self::Failed { .. } => None,
        }
    }
}

pub fn build_view(raw: Option<&Value>, container_width: f64, config: &Config) -> ForecastView {
    let options = NormalizeOptions::from(&config.forecast);

    let days = match normalize_with(raw, &options) {
        NormalizeOutcome::Days(days) => days,
        NormalizeOutcome::Empty => return ForecastView::Unavailable,
        NormalizeOutcome::Error(message) => {
            tracing::warn!(%message, "Forecast payload carried an upstream error");
            return ForecastView::Failed { message };
        }
    };

    let chart = match PlotArea::from_layout(&config.chart, container_width) {
        Ok(plot) => build_geometry(&days, plot).into_chart(),
        Err(e) => {
            tracing::warn!(container_width, "Skipping temperature chart: {}", e);
            None
        }
    };

    let cards = summarize(&days, &SummaryOptions::from(&config.forecast));

    ForecastView::Ready(ForecastPanel { days, chart, cards })
}

//! Forecast pipeline for Citycast
//!
//! Normalizes forecast payloads from several upstream shapes into canonical
//! days, and derives the geometry of the max/min temperature chart plus the
//! per-day summary cards.

pub mod curve;
pub mod geometry;
pub mod labels;
pub mod normalize;
pub mod payload;
pub mod scale;
pub mod summary;
pub mod types;
pub mod view;

pub use curve::{CurvePath, PathCommand, PlotPoint};
pub use geometry::{build_geometry, ChartGeometry, GeometryOutcome, PlotArea, Tick};
pub use normalize::{normalize, normalize_with, NormalizeOptions, MAX_FORECAST_DAYS};
pub use payload::{parse_payload, RawForecastPayload};
pub use scale::LinearScale;
pub use summary::{summarize, DayCard, HourlyRow, SummaryOptions};
pub use types::*;
pub use view::{build_view, ForecastPanel, ForecastView};

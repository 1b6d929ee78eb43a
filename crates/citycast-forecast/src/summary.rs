//! Per-day summary cards: the numbers and strings a card renderer shows.

use citycast_core::ForecastConfig;
use serde::Serialize;
use serde_json::Value;

use crate::labels::{clock_time, epoch_clock_time, short_date};
use crate::payload::{sample_temperature, sample_timestamp};
use crate::types::{NormalizedDay, WeatherCondition};

/// Shown in place of a missing daily high or low
pub const MISSING_TEMPERATURE: &str = "—";

/// Shown in place of a missing hourly reading
pub const MISSING_HOURLY_TEMPERATURE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Leading entries shown in the hourly breakdown
    pub hourly_rows: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { hourly_rows: 3 }
    }
}

impl From<&ForecastConfig> for SummaryOptions {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            hourly_rows: config.hourly_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCard {
    pub date: String,
    pub date_label: String,
    pub high: Option<i64>,
    pub low: Option<i64>,
    pub high_text: String,
    pub low_text: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub condition: Option<WeatherCondition>,
    pub hourly: Vec<HourlyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub time_label: String,
    pub temperature_text: String,
    pub description: String,
}

pub fn summarize(days: &[NormalizedDay], options: &SummaryOptions) -> Vec<DayCard> {
    days.iter().map(|day| day_card(day, options)).collect()
}

fn day_card(day: &NormalizedDay, options: &SummaryOptions) -> DayCard {
    let high = day.temp_max.map(round_degrees);
    let low = day.temp_min.map(round_degrees);

    let hourly = day
        .entries
        .as_deref()
        .unwrap_or_default()
        .iter()
        .take(options.hourly_rows)
        .map(hourly_row)
        .collect();

    DayCard {
        date: day.date.clone(),
        date_label: short_date(&day.date),
        high,
        low,
        high_text: degrees_text(high),
        low_text: degrees_text(low),
        sunrise: day.sunrise.as_deref().map(clock_time),
        sunset: day.sunset.as_deref().map(clock_time),
        condition: day.condition(),
        hourly,
    }
}

fn hourly_row(entry: &Value) -> HourlyRow {
    let time_label = sample_timestamp(entry)
        .and_then(epoch_clock_time)
        .or_else(|| entry.get("dt_txt").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default();

    let temperature_text = match sample_temperature(entry) {
        Some(temp) => format!("{}°", round_degrees(temp)),
        None => MISSING_HOURLY_TEMPERATURE.to_string(),
    };

    let description = entry
        .pointer("/weather/0/description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    HourlyRow {
        time_label,
        temperature_text,
        description,
    }
}

fn round_degrees(value: f64) -> i64 {
    value.round() as i64
}

fn degrees_text(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING_TEMPERATURE.to_string(), |v| v.to_string())
}

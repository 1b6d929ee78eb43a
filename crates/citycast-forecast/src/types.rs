use citycast_core::ForecastError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert a WMO weather code (as sent in `weathercode`).
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i64) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            // Freezing drizzle and freezing rain
            56 | 57 | 66 | 67 => Self::Sleet,
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Icon name understood by the card renderer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Fog => "cloud_fog",
            Self::Drizzle | Self::Rain | Self::HeavyRain => "cloud_rain",
            Self::Snow | Self::Sleet => "cloud_snow",
            Self::Thunderstorm => "cloud_lightning",
        }
    }
}

/// One calendar day of forecast, independent of the upstream shape.
///
/// Missing temperatures stay `None` here; only the chart projection turns
/// them into numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDay {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weathercode: Option<i64>,
    /// Raw sub-daily samples kept for the hourly breakdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Value>>,
}

impl NormalizedDay {
    /// A day with only a date and nothing else known about it
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            temp_min: None,
            temp_max: None,
            sunrise: None,
            sunset: None,
            weathercode: None,
            entries: None,
        }
    }

    pub fn with_temps(mut self, temp_min: Option<f64>, temp_max: Option<f64>) -> Self {
        self.temp_min = temp_min;
        self.temp_max = temp_max;
        self
    }

    pub fn condition(&self) -> Option<WeatherCondition> {
        self.weathercode.map(WeatherCondition::from_wmo_code)
    }
}

/// Result of normalizing a raw payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeOutcome {
    Days(Vec<NormalizedDay>),
    Empty,
    /// Upstream error message, untouched
    Error(String),
}

impl NormalizeOutcome {
    /// Convert into a `Result` for callers that treat missing data as an error.
    ///
    /// # Errors
    ///
    /// `ForecastError::NoData` for an empty outcome and
    /// `ForecastError::Upstream` carrying the upstream message.
    pub fn into_result(self) -> Result<Vec<NormalizedDay>, ForecastError> {
        match self {
            Self::Days(days) => Ok(days),
            Self::Empty => Err(ForecastError::NoData),
            Self::Error(message) => Err(ForecastError::Upstream(message)),
        }
    }
}

/// Chart-ready projection of a day. Missing temperatures are 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub index: usize,
    pub temp_max: f64,
    pub temp_min: f64,
}

impl ChartPoint {
    pub fn from_day(index: usize, day: &NormalizedDay) -> Self {
        if day.temp_max.is_none() || day.temp_min.is_none() {
            tracing::debug!(date = %day.date, "Charting missing temperature as 0");
        }

        Self {
            index,
            temp_max: day.temp_max.unwrap_or(0.0),
            temp_min: day.temp_min.unwrap_or(0.0),
        }
    }
}

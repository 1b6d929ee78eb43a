use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast normalization settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Temperature chart layout
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Order of day buckets built from a flat sample list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Days appear in the order their first sample appears upstream.
    #[default]
    FirstSeen,
    /// Day keys are sorted by calendar date before the day cap is applied.
    Calendar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Maximum number of days kept after normalization (default: 5)
    #[serde(default = "default_max_days")]
    pub max_days: usize,

    /// Bucket ordering for sub-daily sample lists
    #[serde(default)]
    pub bucket_order: BucketOrder,

    /// Hourly rows shown on each day card (default: 3)
    #[serde(default = "default_hourly_rows")]
    pub hourly_rows: usize,
}

fn default_max_days() -> usize {
    5
}

fn default_hourly_rows() -> usize {
    3
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            bucket_order: BucketOrder::default(),
            hourly_rows: default_hourly_rows(),
        }
    }
}

/// Outer chart box; the plot area is what remains inside the margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 200.0,
            margin_top: 20.0,
            margin_right: 30.0,
            margin_bottom: 40.0,
            margin_left: 50.0,
        }
    }
}

impl ChartConfig {
    /// Plot width and height for a container of the given width.
    ///
    /// Either dimension may come out zero or negative for narrow containers;
    /// callers validate before drawing.
    pub fn plot_size(&self, container_width: f64) -> (f64, f64) {
        (
            container_width - self.margin_left - self.margin_right,
            self.height - self.margin_top - self.margin_bottom,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("citycast");

        Self {
            config_dir,
            forecast: ForecastConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self, AppError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` when the file does not exist and
    /// `ConfigError::ParseError` when it is not valid TOML for `Config`.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AppError::Config(ConfigError::NotFound(path.display().to_string()))
            }
            _ => AppError::Io(e),
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration from the default location and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), AppError> {
        Self::checked(Self::load()?)
    }

    /// Load configuration from an explicit file and validate it
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult), AppError> {
        Self::checked(Self::load_from(path)?)
    }

    fn checked(config: Self) -> Result<(Self, ValidationResult), AppError> {
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.forecast.max_days == 0 {
            result.add_error("forecast.max_days", "At least one forecast day is required");
        } else if self.forecast.max_days > 16 {
            result.add_warning(
                "forecast.max_days",
                "Providers rarely forecast more than 16 days",
            );
        }

        if self.forecast.hourly_rows == 0 {
            result.add_warning("forecast.hourly_rows", "Hourly breakdown disabled (0 rows)");
        }

        let chart = &self.chart;
        let margins = [
            ("chart.margin_top", chart.margin_top),
            ("chart.margin_right", chart.margin_right),
            ("chart.margin_bottom", chart.margin_bottom),
            ("chart.margin_left", chart.margin_left),
        ];
        for (field, value) in margins {
            if !value.is_finite() || value < 0.0 {
                result.add_error(field, format!("Margin must be a non-negative number, got {}", value));
            }
        }

        if !chart.height.is_finite() || chart.height <= 0.0 {
            result.add_error("chart.height", "Chart height must be greater than 0");
        } else if chart.height <= chart.margin_top + chart.margin_bottom {
            result.add_error(
                "chart.height",
                "Chart height leaves no room for the plot inside the margins",
            );
        } else if chart.height > 2000.0 {
            result.add_warning("chart.height", "Chart height is unusually large (>2000)");
        }

        result
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("citycast");

        Ok(config_dir.join("config.toml"))
    }
}

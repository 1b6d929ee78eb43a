//! Centralized error types for Citycast.
//!
//! This module provides a typed error hierarchy that:
//! - Keeps "no data" and "upstream said no" distinguishable for the view layer
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Forecast(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the path.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Forecast pipeline errors.
///
/// The normalizer and geometry engine report missing data through their
/// outcome enums; these variants are what callers get when they want a
/// `Result` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("No forecast data available")]
    NoData,

    /// Message carried verbatim from the upstream payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid forecast payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid plot area: {width}x{height}")]
    InvalidPlotArea { width: f64, height: f64 },
}

impl ForecastError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ForecastError::NoData => "No forecast available.",
            ForecastError::Upstream(_) => "The weather service reported an error.",
            ForecastError::InvalidPayload(_) => "Received an unreadable forecast. Please try again.",
            ForecastError::InvalidPlotArea { .. } => "The chart area is too small to draw.",
        }
    }
}

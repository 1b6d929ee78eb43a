//! Classification of raw forecast payloads.
//!
//! Upstream providers send one of three shapes. The shape is decided once,
//! here, with a fixed priority: `error`, then `days`, then `daily`, then
//! `list`. Everything downstream matches on [`RawForecastPayload`] instead of
//! probing keys again.

use citycast_core::ForecastError;
use serde_json::Value;

/// A forecast payload after shape detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawForecastPayload<'a> {
    /// No payload at all (absent or JSON `null`)
    Missing,
    /// Payload carried an `error` field
    UpstreamError(&'a Value),
    /// Already-daily records under `days`
    DailyArray(&'a [Value]),
    /// Day buckets holding sub-daily `entries`, under `daily`
    DailyBuckets(&'a [Value]),
    /// Flat chronological samples under `list`
    SampleList(&'a [Value]),
    /// Some other object or value
    Unrecognized,
}

impl<'a> RawForecastPayload<'a> {
    pub fn classify(raw: Option<&'a Value>) -> Self {
        let object = match raw {
            None | Some(Value::Null) => return Self::Missing,
            Some(Value::Object(object)) => object,
            Some(_) => return Self::Unrecognized,
        };

        if let Some(error) = object.get("error").filter(|e| is_set(e)) {
            return Self::UpstreamError(error);
        }

        let non_empty = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_array)
                .filter(|items| !items.is_empty())
                .map(Vec::as_slice)
        };

        if let Some(days) = non_empty("days") {
            Self::DailyArray(days)
        } else if let Some(buckets) = non_empty("daily") {
            Self::DailyBuckets(buckets)
        } else if let Some(samples) = non_empty("list") {
            Self::SampleList(samples)
        } else {
            Self::Unrecognized
        }
    }

    /// Short name used in logs
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::UpstreamError(_) => "error",
            Self::DailyArray(_) => "days",
            Self::DailyBuckets(_) => "daily",
            Self::SampleList(_) => "list",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Truthiness of an `error` field: `null`, `false`, `0` and `""` mean no error.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Error message as it should be shown: strings verbatim, anything else as JSON text.
pub fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Parse payload text received from the weather collaborator.
///
/// # Errors
///
/// Returns `ForecastError::InvalidPayload` when the text is not JSON.
pub fn parse_payload(text: &str) -> Result<Value, ForecastError> {
    serde_json::from_str(text).map_err(|e| ForecastError::InvalidPayload(e.to_string()))
}

/// Day identifier: `date`, then `time`, then position 0 of a tuple record.
pub(crate) fn day_date(day: &Value) -> Option<String> {
    ["date", "time"]
        .iter()
        .find_map(|key| day.get(key).and_then(date_text))
        .or_else(|| day.get(0).and_then(date_text))
}

fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First finite number found under any of `keys`, in order.
pub(crate) fn first_number(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| record.get(key).and_then(finite_number))
}

pub(crate) fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Temperature reading of a sub-daily sample (`main.temp`).
pub(crate) fn sample_temperature(sample: &Value) -> Option<f64> {
    sample
        .get("main")
        .and_then(|main| main.get("temp"))
        .and_then(finite_number)
}

/// Epoch-seconds timestamp of a sub-daily sample (`dt`).
pub(crate) fn sample_timestamp(sample: &Value) -> Option<f64> {
    sample.get("dt").and_then(finite_number)
}

pub(crate) fn integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| finite_number(value).map(|v| v.trunc() as i64))
}

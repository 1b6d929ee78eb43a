//! Forecast normalizer: any supported payload shape in, canonical days out.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use citycast_core::{BucketOrder, ForecastConfig};
use serde_json::Value;

use crate::payload::{
    day_date, error_message, first_number, integer, sample_temperature, sample_timestamp,
    RawForecastPayload,
};
use crate::types::{NormalizeOutcome, NormalizedDay};

/// Default number of days kept from any payload
pub const MAX_FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_days: usize,
    pub bucket_order: BucketOrder,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_days: MAX_FORECAST_DAYS,
            bucket_order: BucketOrder::FirstSeen,
        }
    }
}

impl From<&ForecastConfig> for NormalizeOptions {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            max_days: config.max_days,
            bucket_order: config.bucket_order,
        }
    }
}

/// Normalize with the default options (5 days, first-seen bucket order).
pub fn normalize(raw: Option<&Value>) -> NormalizeOutcome {
    normalize_with(raw, &NormalizeOptions::default())
}

pub fn normalize_with(raw: Option<&Value>, options: &NormalizeOptions) -> NormalizeOutcome {
    let shape = RawForecastPayload::classify(raw);

    let days = match shape {
        RawForecastPayload::Missing | RawForecastPayload::Unrecognized => {
            tracing::debug!(shape = shape.shape_name(), "No forecast data in payload");
            return NormalizeOutcome::Empty;
        }
        RawForecastPayload::UpstreamError(error) => {
            return NormalizeOutcome::Error(error_message(error));
        }
        RawForecastPayload::DailyArray(days) => from_daily_array(days, options.max_days),
        RawForecastPayload::DailyBuckets(buckets) => from_daily_buckets(buckets, options.max_days),
        RawForecastPayload::SampleList(samples) => from_sample_list(samples, options),
    };

    tracing::debug!(shape = shape.shape_name(), days = days.len(), "Normalized forecast");

    if days.is_empty() {
        NormalizeOutcome::Empty
    } else {
        NormalizeOutcome::Days(days)
    }
}

/// Tracks dates already emitted so every date appears once.
#[derive(Default)]
struct SeenDates(HashSet<String>);

impl SeenDates {
    fn admit(&mut self, record: &Value) -> Option<String> {
        let Some(date) = day_date(record) else {
            tracing::warn!("Skipping forecast day without a date");
            return None;
        };

        if self.0.insert(date.clone()) {
            Some(date)
        } else {
            tracing::warn!(%date, "Skipping repeated forecast day");
            None
        }
    }
}

fn from_daily_array(days: &[Value], max_days: usize) -> Vec<NormalizedDay> {
    let mut seen = SeenDates::default();

    // the cap counts raw records, skipped ones included
    days.iter()
        .take(max_days)
        .filter_map(|day| {
            let date = seen.admit(day)?;
            Some(NormalizedDay {
                date,
                temp_min: first_number(day, &["temp_min", "temperature_2m_min"]),
                temp_max: first_number(day, &["temp_max", "temperature_2m_max"]),
                sunrise: text_field(day, "sunrise"),
                sunset: text_field(day, "sunset"),
                weathercode: day.get("weathercode").and_then(integer),
                entries: day.get("entries").and_then(Value::as_array).cloned(),
            })
        })
        .collect()
}

fn from_daily_buckets(buckets: &[Value], max_days: usize) -> Vec<NormalizedDay> {
    let mut seen = SeenDates::default();

    buckets
        .iter()
        .take(max_days)
        .filter_map(|bucket| {
            let date = seen.admit(bucket)?;
            let entries = bucket
                .get("entries")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let (temp_min, temp_max) = temperature_range(&entries);

            Some(NormalizedDay {
                temp_min,
                temp_max,
                entries: Some(entries),
                ..NormalizedDay::new(date)
            })
        })
        .collect()
}

fn from_sample_list(samples: &[Value], options: &NormalizeOptions) -> Vec<NormalizedDay> {
    let mut buckets: Vec<(String, Vec<Value>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let Some(key) = day_key(sample) else {
            tracing::debug!("Skipping forecast sample without a usable timestamp");
            continue;
        };

        match positions.entry(key) {
            Entry::Occupied(slot) => {
                if let Some((_, members)) = buckets.get_mut(*slot.get()) {
                    members.push(sample.clone());
                }
            }
            Entry::Vacant(slot) => {
                buckets.push((slot.key().clone(), vec![sample.clone()]));
                slot.insert(buckets.len() - 1);
            }
        }
    }

    if options.bucket_order == BucketOrder::Calendar {
        // ISO dates sort lexically in calendar order
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
    }

    buckets
        .into_iter()
        .take(options.max_days)
        .map(|(date, members)| {
            let (temp_min, temp_max) = temperature_range(&members);
            NormalizedDay {
                temp_min,
                temp_max,
                entries: Some(members),
                ..NormalizedDay::new(date)
            }
        })
        .collect()
}

/// UTC calendar date (`YYYY-MM-DD`) of a sample's epoch-seconds `dt`.
fn day_key(sample: &Value) -> Option<String> {
    let seconds = sample_timestamp(sample)?;
    let millis = (seconds * 1000.0).trunc();
    if !(i64::MIN as f64..=i64::MAX as f64).contains(&millis) {
        return None;
    }

    let instant = DateTime::<Utc>::from_timestamp_millis(millis as i64)?;
    Some(instant.format("%Y-%m-%d").to_string())
}

/// Min and max over the finite sample temperatures; both `None` when there are none.
fn temperature_range(samples: &[Value]) -> (Option<f64>, Option<f64>) {
    samples
        .iter()
        .filter_map(sample_temperature)
        .fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), t| {
            (
                Some(lo.map_or(t, |lo| lo.min(t))),
                Some(hi.map_or(t, |hi| hi.max(t))),
            )
        })
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn days_of(outcome: NormalizeOutcome) -> Vec<NormalizedDay> {
        match outcome {
            NormalizeOutcome::Days(days) => days,
            other => panic!("expected days, got {:?}", other),
        }
    }

    fn sample(dt: i64, temp: Value) -> Value {
        json!({ "dt": dt, "main": { "temp": temp } })
    }

    #[test]
    fn test_absent_payload_is_empty() {
        assert_eq!(normalize(None), NormalizeOutcome::Empty);
    }

    #[test]
    fn test_error_is_propagated_verbatim() {
        let raw = json!({ "error": "rate limited" });
        assert_eq!(
            normalize(Some(&raw)),
            NormalizeOutcome::Error("rate limited".to_string())
        );
    }

    #[test]
    fn test_daily_array_alternate_names() {
        let raw = json!({
            "days": [{ "date": "2024-01-15", "temperature_2m_min": 10, "temperature_2m_max": 20 }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temp_min, Some(10.0));
        assert_eq!(days[0].temp_max, Some(20.0));
    }

    #[test]
    fn test_daily_array_prefers_canonical_names() {
        let raw = json!({
            "days": [{
                "time": "2024-01-15",
                "temp_min": 1.5,
                "temperature_2m_min": 10,
                "temp_max": "n/a",
                "temperature_2m_max": 20
            }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days[0].date, "2024-01-15");
        assert_eq!(days[0].temp_min, Some(1.5));
        // a non-numeric canonical value falls through to the alternate
        assert_eq!(days[0].temp_max, Some(20.0));
    }

    #[test]
    fn test_daily_array_passes_through_extras() {
        let raw = json!({
            "days": [{
                "date": "2024-01-15",
                "sunrise": "2024-01-15T07:32",
                "sunset": "2024-01-15T16:05",
                "weathercode": 61,
                "entries": [{ "dt": 1705305600 }]
            }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days[0].sunrise.as_deref(), Some("2024-01-15T07:32"));
        assert_eq!(days[0].sunset.as_deref(), Some("2024-01-15T16:05"));
        assert_eq!(days[0].weathercode, Some(61));
        assert_eq!(days[0].entries.as_ref().map(Vec::len), Some(1));
        assert_eq!(days[0].temp_min, None);
    }

    #[test]
    fn test_daily_array_tuple_dates() {
        let raw = json!({ "days": [["2024-01-15"], ["2024-01-16"]] });
        let days = days_of(normalize(Some(&raw)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-16"]);
    }

    #[test]
    fn test_daily_array_is_capped() {
        let days: Vec<Value> = (1..=7)
            .map(|d| json!({ "date": format!("2024-01-{:02}", d) }))
            .collect();
        let raw = json!({ "days": days });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days.len(), 5);
        assert_eq!(days[4].date, "2024-01-05");
    }

    #[test]
    fn test_daily_array_skips_undated_and_repeated_days() {
        let raw = json!({
            "days": [
                { "date": "2024-01-15" },
                { "temp_min": 3 },
                { "date": "2024-01-15", "temp_min": 4 },
                { "date": "2024-01-16" }
            ]
        });
        let days = days_of(normalize(Some(&raw)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-16"]);
        assert_eq!(days[0].temp_min, None);
    }

    #[test]
    fn test_daily_buckets_min_max() {
        let raw = json!({
            "daily": [{
                "date": "2024-01-15",
                "entries": [
                    { "main": { "temp": 18 } },
                    { "main": { "temp": 22 } },
                    { "main": { "temp": 19 } }
                ]
            }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days[0].temp_min, Some(18.0));
        assert_eq!(days[0].temp_max, Some(22.0));
        assert_eq!(days[0].entries.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_daily_buckets_non_numeric_temps_stay_missing() {
        let raw = json!({
            "daily": [{
                "date": "2024-01-15",
                "entries": [{ "main": { "temp": "hot" } }, { "main": {} }, {}]
            }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days[0].temp_min, None);
        assert_eq!(days[0].temp_max, None);
    }

    #[test]
    fn test_daily_buckets_keep_zero_readings() {
        let raw = json!({
            "daily": [{ "date": "2024-01-15", "entries": [{ "main": { "temp": 0 } }, { "main": { "temp": -3 } }] }]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days[0].temp_min, Some(-3.0));
        assert_eq!(days[0].temp_max, Some(0.0));
    }

    #[test]
    fn test_daily_buckets_take_first_five() {
        let buckets: Vec<Value> = (1..=6)
            .map(|d| json!({ "date": format!("2024-01-{:02}", d), "entries": [] }))
            .collect();
        let raw = json!({ "daily": buckets });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, "2024-01-01");
    }

    #[test]
    fn test_daily_buckets_cap_counts_skipped_buckets() {
        let mut buckets: Vec<Value> = (1..=5)
            .map(|d| json!({ "date": format!("2024-01-{:02}", d), "entries": [] }))
            .collect();
        buckets.insert(2, json!({ "entries": [] }));
        let raw = json!({ "daily": buckets });

        let days = days_of(normalize(Some(&raw)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn test_daily_array_cap_counts_skipped_records() {
        let raw = json!({
            "days": [
                { "date": "a" }, { "date": "a" }, { "date": "b" }, { "date": "c" },
                { "date": "d" }, { "date": "e" }
            ]
        });
        let days = days_of(normalize(Some(&raw)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sample_list_buckets_by_utc_day() {
        // 2024-01-15 00:00, 03:00, 06:00 UTC and 2024-01-16 00:00 UTC
        let raw = json!({
            "list": [
                sample(1_705_276_800, json!(15)),
                sample(1_705_287_600, json!(21)),
                sample(1_705_298_400, json!("missing")),
                sample(1_705_363_200, json!(9)),
            ]
        });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-15");
        assert_eq!((days[0].temp_min, days[0].temp_max), (Some(15.0), Some(21.0)));
        assert_eq!(days[0].entries.as_ref().map(Vec::len), Some(3));
        assert_eq!(days[1].date, "2024-01-16");
        assert_eq!((days[1].temp_min, days[1].temp_max), (Some(9.0), Some(9.0)));
        assert_eq!(days[1].sunrise, None);
    }

    #[test]
    fn test_sample_list_first_seen_order() {
        let raw = json!({
            "list": [sample(1_705_363_200, json!(9)), sample(1_705_276_800, json!(15))]
        });
        let days = days_of(normalize(Some(&raw)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-16", "2024-01-15"]);
    }

    #[test]
    fn test_sample_list_calendar_order() {
        let raw = json!({
            "list": [sample(1_705_363_200, json!(9)), sample(1_705_276_800, json!(15))]
        });
        let options = NormalizeOptions {
            bucket_order: BucketOrder::Calendar,
            ..NormalizeOptions::default()
        };
        let days = days_of(normalize_with(Some(&raw), &options));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-16"]);
    }

    #[test]
    fn test_sample_list_caps_distinct_days() {
        let samples: Vec<Value> = (0..8)
            .map(|d| sample(1_705_276_800 + d * 86_400, json!(d)))
            .collect();
        let raw = json!({ "list": samples });
        let days = days_of(normalize(Some(&raw)));
        assert_eq!(days.len(), 5);
        assert_eq!(days[4].date, "2024-01-19");
    }

    #[test]
    fn test_sample_list_without_timestamps_is_empty() {
        let raw = json!({ "list": [{ "main": { "temp": 3 } }] });
        assert_eq!(normalize(Some(&raw)), NormalizeOutcome::Empty);
    }

    #[test]
    fn test_custom_day_cap() {
        let raw = json!({ "days": [{ "date": "a" }, { "date": "b" }, { "date": "c" }] });
        let options = NormalizeOptions {
            max_days: 2,
            ..NormalizeOptions::default()
        };
        assert_eq!(days_of(normalize_with(Some(&raw), &options)).len(), 2);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let raw = json!({
            "list": [sample(1_705_276_800, json!(15)), sample(1_705_363_200, json!(9))]
        });
        assert_eq!(normalize(Some(&raw)), normalize(Some(&raw)));
    }
}

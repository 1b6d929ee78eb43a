use anyhow::Result;
use citycast_core::{AppError, Config};
use citycast_forecast::{build_view, parse_payload, ForecastView};
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    citycast_core::init()?;

    let view = match run(&cli) {
        Ok(view) => view,
        Err(e) => {
            tracing::error!(error = %e, "{}", e.user_message());
            return Err(e.into());
        }
    };

    match &view {
        ForecastView::Ready(panel) => tracing::info!(
            days = panel.days.len(),
            charted = panel.chart.is_some(),
            "Forecast ready"
        ),
        ForecastView::Failed { message } => tracing::warn!(%message, "Forecast unavailable"),
        ForecastView::Unavailable => tracing::info!("No forecast data"),
    }

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn run(cli: &Cli) -> Result<ForecastView, AppError> {
    let (config, _) = match &cli.config {
        Some(path) => Config::load_validated_from(path)?,
        None => Config::load_validated()?,
    };

    let text = std::fs::read_to_string(&cli.payload).map_err(|e| {
        tracing::error!(path = %cli.payload.display(), "Failed to read forecast payload");
        AppError::Io(e)
    })?;
    let payload = parse_payload(&text)?;

    Ok(build_view(Some(&payload), cli.container_width, &config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_inputs(dir: &std::path::Path, payload: &str) -> (PathBuf, PathBuf) {
        let payload_path = dir.join("forecast.json");
        std::fs::write(&payload_path, payload).unwrap();
        let config_path = dir.join("config.toml");
        Config::default().save_to(&config_path).unwrap();
        (payload_path, config_path)
    }

    fn cli(payload: PathBuf, config: PathBuf, container_width: f64) -> Cli {
        Cli {
            payload,
            container_width,
            config: Some(config),
        }
    }

    #[test]
    fn test_run_builds_ready_view() {
        let dir = tempfile::tempdir().unwrap();
        let (payload, config) = write_inputs(
            dir.path(),
            r#"{ "days": [{ "date": "2024-01-15", "temp_min": 2, "temp_max": 9 }] }"#,
        );

        let view = run(&cli(payload, config, 640.0)).unwrap();
        let panel = view.panel().unwrap();
        assert_eq!(panel.days.len(), 1);
        assert!(panel.chart.is_some());
    }

    #[test]
    fn test_run_rejects_malformed_payload() {
        let dir = tempfile::tempdir().unwrap();
        let (payload, config) = write_inputs(dir.path(), "{ not json");

        let err = run(&cli(payload, config, 640.0)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Forecast(citycast_core::ForecastError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_run_reports_missing_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_, config) = write_inputs(dir.path(), "{}");

        let err = run(&cli(dir.path().join("absent.json"), config, 640.0)).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}

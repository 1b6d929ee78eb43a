use std::path::PathBuf;

use clap::Parser;

/// Chart container width when none is given on the command line
pub const DEFAULT_CONTAINER_WIDTH: f64 = 640.0;

#[derive(Debug, Parser)]
#[command(name = "citycast")]
#[command(about = "Normalize a forecast payload and compute its temperature chart")]
#[command(version)]
pub struct Cli {
    /// Forecast payload JSON file
    pub payload: PathBuf,

    /// Width of the chart container in pixels
    #[arg(default_value_t = DEFAULT_CONTAINER_WIDTH, value_parser = container_width)]
    pub container_width: f64,

    /// Configuration file
    ///
    /// Defaults to citycast/config.toml in the user configuration directory,
    /// created with default settings when missing.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn container_width(raw: &str) -> Result<f64, String> {
    let width: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(format!("`{}` is not a usable width", raw))
    }
}

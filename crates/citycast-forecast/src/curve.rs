//! Monotone cubic curves through plotted points.
//!
//! Tangents follow Steffen's method: at every interior point the tangent is
//! limited by the neighbouring secant slopes, and it is zero wherever the data
//! turns (a local maximum or minimum). Each segment is a cubic Bézier whose
//! control points sit a third of the way along the segment, so the curve hits
//! every point and never overshoots between monotone neighbours.

use std::fmt;

use serde::Serialize;

/// A point in plot (pixel) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(PlotPoint),
    LineTo(PlotPoint),
    CubicTo {
        c1: PlotPoint,
        c2: PlotPoint,
        to: PlotPoint,
    },
    Close,
}

/// Sequence of path commands; `Display` renders SVG path data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurvePath {
    pub commands: Vec<PathCommand>,
}

impl CurvePath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every on-curve point the path visits, control points excluded.
    pub fn vertices(&self) -> Vec<PlotPoint> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::CubicTo { to, .. } => Some(*to),
                PathCommand::Close => None,
            })
            .collect()
    }
}

impl fmt::Display for CurvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => write!(f, "M{}", coords(p))?,
                PathCommand::LineTo(p) => write!(f, "L{}", coords(p))?,
                PathCommand::CubicTo { c1, c2, to } => {
                    write!(f, "C{},{},{}", coords(c1), coords(c2), coords(to))?
                }
                PathCommand::Close => write!(f, "Z")?,
            }
        }
        Ok(())
    }
}

fn coords(p: &PlotPoint) -> String {
    format!("{},{}", number(p.x), number(p.y))
}

/// Three decimals are plenty for pixels.
fn number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    format!("{}", rounded)
}

/// Open monotone curve through `points`, in order.
pub fn monotone_line(points: &[PlotPoint]) -> CurvePath {
    CurvePath {
        commands: monotone_commands(points),
    }
}

/// Closed band between an upper and a lower series.
///
/// Runs along `upper` left to right, drops to the end of `lower`, runs back
/// along `lower` and closes.
pub fn monotone_band(upper: &[PlotPoint], lower: &[PlotPoint]) -> CurvePath {
    let mut commands = monotone_commands(upper);
    if commands.is_empty() {
        return CurvePath::default();
    }

    let lower_reversed: Vec<PlotPoint> = lower.iter().rev().copied().collect();
    commands.extend(
        monotone_commands(&lower_reversed)
            .into_iter()
            .map(|command| match command {
                PathCommand::MoveTo(p) => PathCommand::LineTo(p),
                other => other,
            }),
    );
    commands.push(PathCommand::Close);

    CurvePath { commands }
}

fn monotone_commands(points: &[PlotPoint]) -> Vec<PathCommand> {
    let mut points = points.to_vec();
    points.dedup();

    match points.as_slice() {
        [] => Vec::new(),
        [only] => vec![PathCommand::MoveTo(*only)],
        [first, second] => vec![PathCommand::MoveTo(*first), PathCommand::LineTo(*second)],
        [first, ..] => {
            let slopes = tangents(&points);
            let mut commands = Vec::with_capacity(points.len());
            commands.push(PathCommand::MoveTo(*first));
            commands.extend(
                points
                    .windows(2)
                    .zip(slopes.windows(2))
                    .map(|(segment, ends)| cubic(segment[0], segment[1], ends[0], ends[1])),
            );
            commands
        }
    }
}

/// Tangent slope at every point; needs at least three points.
fn tangents(points: &[PlotPoint]) -> Vec<f64> {
    let n = points.len();
    let mut slopes = Vec::with_capacity(n);
    slopes.push(0.0);
    slopes.extend(
        points
            .windows(3)
            .map(|w| interior_tangent(w[0], w[1], w[2])),
    );
    slopes.push(0.0);

    slopes[0] = end_tangent(points[0], points[1], slopes[1]);
    slopes[n - 1] = end_tangent(points[n - 2], points[n - 1], slopes[n - 2]);
    slopes
}

fn secant(a: PlotPoint, b: PlotPoint) -> f64 {
    let h = b.x - a.x;
    if h == 0.0 {
        0.0
    } else {
        (b.y - a.y) / h
    }
}

fn sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn interior_tangent(p0: PlotPoint, p1: PlotPoint, p2: PlotPoint) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = secant(p0, p1);
    let s1 = secant(p1, p2);
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);

    // opposite signs give 0: flat tangent at a turning point
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

/// One-sided tangent at the first or last point, from the neighbour's tangent.
fn end_tangent(a: PlotPoint, b: PlotPoint, neighbour: f64) -> f64 {
    let h = b.x - a.x;
    if h == 0.0 {
        neighbour
    } else {
        (3.0 * (b.y - a.y) / h - neighbour) / 2.0
    }
}

fn cubic(a: PlotPoint, b: PlotPoint, ta: f64, tb: f64) -> PathCommand {
    let dx = (b.x - a.x) / 3.0;
    PathCommand::CubicTo {
        c1: PlotPoint::new(a.x + dx, a.y + dx * ta),
        c2: PlotPoint::new(b.x - dx, b.y - dx * tb),
        to: b,
    }
}

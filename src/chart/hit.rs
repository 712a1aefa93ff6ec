//! Pointer hit-testing against a computed [`ChartLayout`].
//!
//! Distance is measured to the polyline segments, not just the vertices, so a
//! hover anywhere along a line finds its scenario. The hover marker snaps to
//! the cursor's x position on the nearest line, interpolating linearly between
//! decade bins.

use crate::models::{DecadeBin, Region, Scenario};

use super::layout::{ChartLayout, ScenarioPath};

/// Maximum pointer distance (px) from a line for a hover to register.
pub const HOVER_MAX_DIST_PX: f64 = 24.0;
/// Within this distance of a bin vertex the tooltip shows the exact bin.
pub const VERTEX_SNAP_PX: f64 = 3.0;

/// What the tooltip displays for a hover.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub scenario: Scenario,
    pub region: Region,
    /// Decade range, e.g. `2030–2039`; collapses to a single year for an
    /// interpolated position.
    pub years: String,
    /// Value in mm/day.
    pub value: f64,
    /// Samples in the bin; `None` for interpolated positions.
    pub count: Option<usize>,
}

/// Result of a successful hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    pub scenario: Scenario,
    /// Marker position on the line, snapped to the cursor x.
    pub marker: (f64, f64),
    pub tooltip: TooltipContent,
}

/// Legend-hover highlight: one focused scenario, the rest dimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub focus: Scenario,
    pub dimmed: Vec<Scenario>,
}

/// Find the line nearest the pointer, if any is within range.
pub fn hit_test(layout: &ChartLayout, px: f64, py: f64) -> Option<Hover> {
    if !layout.plot.contains(px, py) {
        return None;
    }
    let mut best: Option<(f64, &ScenarioPath)> = None;
    for path in &layout.paths {
        let d = polyline_distance(&path.points, px, py);
        if d <= HOVER_MAX_DIST_PX && best.map(|(bd, _)| d < bd).unwrap_or(true) {
            best = Some((d, path));
        }
    }
    let (_, path) = best?;
    Some(hover_on_path(layout, path, px))
}

/// Highlight for a hover over a legend entry.
pub fn legend_hover(layout: &ChartLayout, focus: Scenario) -> Highlight {
    Highlight {
        focus,
        dimmed: layout
            .paths
            .iter()
            .map(|p| p.scenario)
            .filter(|s| *s != focus)
            .collect(),
    }
}

fn hover_on_path(layout: &ChartLayout, path: &ScenarioPath, px: f64) -> Hover {
    // Locate the bin pair straddling the cursor x.
    let year = layout.x.invert(px);
    let idx = match path
        .bins
        .binary_search_by(|b| (b.year as f64).total_cmp(&year))
    {
        Ok(i) => i,
        Err(i) => i,
    };

    let region = layout.state.region;

    // Snap to an exact bin when the cursor is close to its vertex.
    for probe in [idx.saturating_sub(1), idx.min(path.bins.len() - 1)] {
        let (vx, vy) = path.points[probe];
        if (px - vx).abs() <= VERTEX_SNAP_PX {
            let bin = &path.bins[probe];
            return Hover {
                scenario: path.scenario,
                marker: (vx, vy),
                tooltip: bin_tooltip(path.scenario, region, bin),
            };
        }
    }

    if idx == 0 || idx >= path.bins.len() {
        // Cursor is beyond an endpoint; clamp to it.
        let i = idx.min(path.bins.len() - 1);
        let bin = &path.bins[i];
        return Hover {
            scenario: path.scenario,
            marker: path.points[i],
            tooltip: bin_tooltip(path.scenario, region, bin),
        };
    }

    let (prev, curr) = (&path.bins[idx - 1], &path.bins[idx]);
    let t = (year - prev.year as f64) / (curr.year - prev.year) as f64;
    let value = prev.value + t * (curr.value - prev.value);
    Hover {
        scenario: path.scenario,
        marker: (px, layout.y.apply(value)),
        tooltip: TooltipContent {
            scenario: path.scenario,
            region,
            years: format!("{}", year.round() as i32),
            value,
            count: None,
        },
    }
}

fn bin_tooltip(scenario: Scenario, region: Region, bin: &DecadeBin) -> TooltipContent {
    TooltipContent {
        scenario,
        region,
        years: format!("{}–{}", bin.bin_start, bin.bin_end),
        value: bin.value,
        count: Some(bin.count),
    }
}

/// Shortest distance from a point to a polyline.
fn polyline_distance(points: &[(f64, f64)], px: f64, py: f64) -> f64 {
    match points {
        [] => f64::INFINITY,
        [(x, y)] => ((px - x).powi(2) + (py - y).powi(2)).sqrt(),
        _ => points
            .windows(2)
            .map(|seg| segment_distance(seg[0], seg[1], px, py))
            .fold(f64::INFINITY, f64::min),
    }
}

fn segment_distance(a: (f64, f64), b: (f64, f64), px: f64, py: f64) -> f64 {
    let (ax, ay) = a;
    let (bx, by) = b;
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

//! Pure chart geometry: scales, polylines, endpoint labels, boundary marker.
//!
//! Everything here is computed from a [`ChartState`] and a [`Dataset`] with no
//! drawing backend involved, so binning, stitching, label placement, and
//! hit-testing are unit-testable in isolation. The draw adapter in the parent
//! module turns a [`ChartLayout`] into backend draw calls.

use crate::models::{Dataset, DecadeBin, HISTORICAL_BOUNDARY_YEAR, Sample, Scenario};
use crate::stats::{TREND_WINDOW, bin_by_decade, stitch_to_historical, stitch_trend, trend_curve};

use super::types::{
    ChartState, LABEL_MIN_GAP_PX, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
    Y_PAD_FRACTION, Y_PAD_MIN,
};

/// Affine map from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return (d0 + d1) / 2.0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// Inner plotting rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Dashed trend overlay for one scenario line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendOverlay {
    pub samples: Vec<Sample>,
    pub points: Vec<(f64, f64)>,
}

/// One rendered scenario line: stitched decade bins plus pixel geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPath {
    pub scenario: Scenario,
    pub bins: Vec<DecadeBin>,
    pub points: Vec<(f64, f64)>,
    pub trend: Option<TrendOverlay>,
}

/// Endpoint value label, de-conflicted and clamped into the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointLabel {
    pub scenario: Scenario,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Vertical marker at the historical/future boundary year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryMarker {
    pub x: f64,
    /// Centered x of the "Historical" label; absent when no historical sample
    /// is visible.
    pub historical_label_x: Option<f64>,
    /// Centered x of the "Future" label; absent when no future sample is
    /// visible.
    pub future_label_x: Option<f64>,
}

/// Complete computed geometry for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub state: ChartState,
    pub plot: PlotArea,
    pub x: LinearScale,
    pub y: LinearScale,
    /// Resolved year domain after window clamping and invalid-window fallback.
    pub domain: (i32, i32),
    pub y_domain: (f64, f64),
    pub paths: Vec<ScenarioPath>,
    pub labels: Vec<EndpointLabel>,
    pub boundary: Option<BoundaryMarker>,
    /// Message rendered instead of lines (empty scenario set, empty window).
    pub placeholder: Option<String>,
}

impl ChartLayout {
    /// Compute the full layout for one redraw. Pure; no backend involved.
    pub fn compute(state: &ChartState, data: &Dataset, width: u32, height: u32) -> ChartLayout {
        let plot = PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: width as f64 - MARGIN_RIGHT,
            bottom: height as f64 - MARGIN_BOTTOM,
        };
        let series = data.region(state.region);

        let hist_start = series.historical.first().map(|s| s.year);
        let future_end = series
            .low
            .iter()
            .chain(series.high.iter())
            .map(|s| s.year)
            .max();
        let full_start = hist_start
            .or_else(|| series.low.first().map(|s| s.year))
            .unwrap_or(HISTORICAL_BOUNDARY_YEAR);
        let full_end = future_end
            .or_else(|| series.historical.last().map(|s| s.year))
            .unwrap_or(HISTORICAL_BOUNDARY_YEAR);

        // Clamp the user window to the data span; an inverted window falls
        // back to the full historical-to-future range.
        let mut domain_start = state.window.start.unwrap_or(full_start).max(full_start);
        let mut domain_end = state.window.end.unwrap_or(full_end).min(full_end);
        if domain_end < domain_start {
            domain_start = full_start;
            domain_end = full_end;
        }
        let domain = (domain_start, domain_end);
        let clip = Some(domain);

        let mut layout = ChartLayout {
            state: *state,
            plot,
            x: LinearScale::new(
                (domain_start as f64, domain_end as f64),
                (plot.left, plot.right),
            ),
            y: LinearScale::new((0.0, 1.0), (plot.bottom, plot.top)),
            domain,
            y_domain: (0.0, 1.0),
            paths: Vec::new(),
            labels: Vec::new(),
            boundary: None,
            placeholder: None,
        };

        if state.active.is_empty() {
            layout.placeholder = Some("Select at least one scenario to display.".to_string());
            return layout;
        }

        // Historical bins are needed for stitching even when the historical
        // line itself is toggled off.
        let hist_bins = bin_by_decade(&series.historical, clip);
        let historical_inside_domain = series
            .historical
            .last()
            .map(|s| s.year >= domain_start && s.year <= domain_end)
            .unwrap_or(false);

        for scenario in state.active.iter() {
            let bins = if scenario == Scenario::Historical {
                hist_bins.clone()
            } else {
                let mut bins = bin_by_decade(series.scenario(scenario), clip);
                if historical_inside_domain {
                    if let Some(last) = hist_bins.last() {
                        stitch_to_historical(&mut bins, last);
                    }
                }
                bins
            };
            // Every sample fell outside the window: omit the line, no error.
            if bins.is_empty() {
                continue;
            }
            layout.paths.push(ScenarioPath {
                scenario,
                bins,
                points: Vec::new(),
                trend: None,
            });
        }

        if layout.paths.is_empty() {
            layout.placeholder = Some("No data in the selected year range.".to_string());
            return layout;
        }

        // Trend curves before the y-domain so both use final data. The
        // historical curve anchors the future curves' stitching regardless of
        // whether the historical line is displayed.
        if state.show_regression {
            let hist_trend = trend_curve(&hist_bins, TREND_WINDOW);
            for path in &mut layout.paths {
                let samples = if path.scenario == Scenario::Historical {
                    hist_trend.clone()
                } else {
                    let mut t = trend_curve(&path.bins, TREND_WINDOW);
                    if historical_inside_domain {
                        if let Some(last) = hist_trend.last() {
                            stitch_trend(&mut t, *last);
                        }
                    }
                    t
                };
                if !samples.is_empty() {
                    path.trend = Some(TrendOverlay {
                        samples,
                        points: Vec::new(),
                    });
                }
            }
        }

        // Y domain over the scenarios actually shown, padded by 6% of the
        // range with an absolute floor.
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;
        for path in &layout.paths {
            for b in &path.bins {
                min_v = min_v.min(b.value);
                max_v = max_v.max(b.value);
            }
            if let Some(trend) = &path.trend {
                for s in &trend.samples {
                    min_v = min_v.min(s.value);
                    max_v = max_v.max(s.value);
                }
            }
        }
        let pad = (Y_PAD_FRACTION * (max_v - min_v)).max(Y_PAD_MIN);
        layout.y_domain = (min_v - pad, max_v + pad);
        layout.y = LinearScale::new(layout.y_domain, (plot.bottom, plot.top));

        for path in &mut layout.paths {
            path.points = path
                .bins
                .iter()
                .map(|b| (layout.x.apply(b.year as f64), layout.y.apply(b.value)))
                .collect();
            if let Some(trend) = &mut path.trend {
                trend.points = trend
                    .samples
                    .iter()
                    .map(|s| (layout.x.apply(s.year as f64), layout.y.apply(s.value)))
                    .collect();
            }
        }

        layout.labels = compute_endpoint_labels(&layout.paths, &plot, width as f64);
        layout.boundary = compute_boundary_marker(&layout, series, domain);
        layout
    }

    pub fn path(&self, scenario: Scenario) -> Option<&ScenarioPath> {
        self.paths.iter().find(|p| p.scenario == scenario)
    }
}

/// One value label per line endpoint, vertically de-conflicted and clamped
/// into the canvas.
fn compute_endpoint_labels(
    paths: &[ScenarioPath],
    plot: &PlotArea,
    canvas_width: f64,
) -> Vec<EndpointLabel> {
    let mut labels: Vec<EndpointLabel> = paths
        .iter()
        .filter_map(|path| {
            let (px, py) = *path.points.last()?;
            let value = path.bins.last()?.value;
            Some(EndpointLabel {
                scenario: path.scenario,
                text: format!("{:.2}", value),
                x: (px + 8.0).min(canvas_width - 48.0),
                y: py.clamp(plot.top + 6.0, plot.bottom - 6.0),
            })
        })
        .collect();

    // De-confliction: sort by y and push later labels further down, then pull
    // back up if the stack ran past the bottom edge.
    labels.sort_by(|a, b| a.y.total_cmp(&b.y));
    for i in 1..labels.len() {
        if labels[i].y - labels[i - 1].y < LABEL_MIN_GAP_PX {
            labels[i].y = labels[i - 1].y + LABEL_MIN_GAP_PX;
        }
    }
    if let Some(last) = labels.last_mut() {
        last.y = last.y.min(plot.bottom - 6.0);
    }
    for i in (0..labels.len().saturating_sub(1)).rev() {
        if labels[i + 1].y - labels[i].y < LABEL_MIN_GAP_PX {
            labels[i].y = labels[i + 1].y - LABEL_MIN_GAP_PX;
        }
    }
    labels
}

fn compute_boundary_marker(
    layout: &ChartLayout,
    series: &crate::models::RegionSeries,
    domain: (i32, i32),
) -> Option<BoundaryMarker> {
    let (start, end) = domain;
    let boundary = HISTORICAL_BOUNDARY_YEAR;
    if boundary < start || boundary > end {
        return None;
    }
    let visible = |s: &Sample| s.year >= start && s.year <= end;
    let has_historical = series.historical.iter().any(visible);
    let has_future = series.low.iter().any(visible) || series.high.iter().any(visible);
    Some(BoundaryMarker {
        x: layout.x.apply(boundary as f64),
        historical_label_x: has_historical.then(|| {
            layout
                .x
                .apply((start as f64 + boundary.min(end) as f64) / 2.0)
        }),
        future_label_x: has_future.then(|| {
            layout
                .x
                .apply((boundary.max(start) as f64 + end as f64) / 2.0)
        }),
    })
}

//! Chart rendering: precipitation trends and decade rate-of-change.
//!
//! The geometry lives in [`layout`] and is backend-free; this module adapts a
//! computed [`ChartLayout`] onto a plotters drawing area. Output backend is
//! chosen by file extension: `.svg` uses the SVG backend, everything else the
//! bitmap backend.

pub mod hit;
pub mod instance;
pub mod layout;
pub mod types;

pub use hit::{Hover, TooltipContent, hit_test, legend_hover};
pub use instance::{ChartInstance, Phase, Surface};
pub use layout::ChartLayout;
pub use types::{ChartState, ScenarioSet, YearWindow, scenario_color, trend_color};

use anyhow::Result;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use crate::models::{Dataset, HISTORICAL_BOUNDARY_YEAR, RateBin, Scenario};
use crate::stats::{bin_by_decade, rate_of_change, stitch_rate, stitch_to_historical};

/// One-time registration of a bundled "sans-serif" font for the `ab_glyph`
/// text path, which does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Render the precipitation trend chart for `state` to `out_path`.
pub fn render_chart(
    state: &ChartState,
    data: &Dataset,
    out_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let layout = ChartLayout::compute(state, data, width, height);
    let path_string = out_path.to_string_lossy().to_string();
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_layout(root, &layout)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_layout(root, &layout)?;
    }
    Ok(())
}

/// Draw a computed layout onto any plotters backend.
fn draw_layout<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, layout: &ChartLayout) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let title = format!("{}: Precipitation by Decade", layout.state.region.name());
    let title_style = TextStyle::from((FontFamily::SansSerif, 18))
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(
        title,
        (
            ((layout.plot.left + layout.plot.right) / 2.0) as i32,
            (layout.plot.top / 2.0 - 9.0) as i32,
        ),
        title_style,
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if let Some(message) = &layout.placeholder {
        draw_centered_message(&root, layout, message)?;
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        return Ok(());
    }

    let (x0, x1) = layout.domain;
    // A one-year domain collapses the x axis; widen it so the chart stays valid.
    let (x0, x1) = if x1 - x0 < 1 {
        (x0 as f64 - 1.0, x1 as f64 + 1.0)
    } else {
        (x0 as f64, x1 as f64)
    };
    let (y0, y1) = layout.y_domain;
    let mut chart = ChartBuilder::on(&root)
        .set_label_area_size(LabelAreaPosition::Left, types::MARGIN_LEFT as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, types::MARGIN_BOTTOM as u32)
        .set_label_area_size(LabelAreaPosition::Right, types::MARGIN_RIGHT as u32)
        .set_label_area_size(LabelAreaPosition::Top, types::MARGIN_TOP as u32)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Precipitation (mm/day)")
        .x_label_formatter(&|v: &f64| format!("{:.0}", v))
        .y_label_formatter(&|v: &f64| format!("{:.2}", v))
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    for path in &layout.paths {
        let color = scenario_color(path.scenario);
        chart
            .draw_series(LineSeries::new(
                path.bins.iter().map(|b| (b.year as f64, b.value)),
                color.stroke_width(2),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        if let Some(trend) = &path.trend {
            chart
                .draw_series(DashedLineSeries::new(
                    trend.samples.iter().map(|s| (s.year as f64, s.value)),
                    6,
                    4,
                    trend_color(path.scenario).stroke_width(2),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }

    if let Some(boundary) = &layout.boundary {
        let bx = HISTORICAL_BOUNDARY_YEAR as f64;
        chart
            .draw_series(DashedLineSeries::new(
                [(bx, y0), (bx, y1)],
                5,
                5,
                scenario_color(Scenario::Historical).mix(0.7).stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let side_style = TextStyle::from((FontFamily::SansSerif, 13))
            .pos(Pos::new(HPos::Center, VPos::Top));
        let label_y = (layout.plot.top + 6.0) as i32;
        if let Some(x) = boundary.historical_label_x {
            root.draw(&Text::new("Historical", (x as i32, label_y), side_style.clone()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        if let Some(x) = boundary.future_label_x {
            root.draw(&Text::new("Future", (x as i32, label_y), side_style))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }

    for label in &layout.labels {
        let color = scenario_color(label.scenario);
        let style = TextStyle::from((FontFamily::SansSerif, 13))
            .pos(Pos::new(HPos::Left, VPos::Center))
            .color(&color);
        root.draw(&Text::new(
            label.text.clone(),
            (label.x as i32, label.y as i32),
            style,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_centered_message<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    message: &str,
) -> Result<()> {
    let style = TextStyle::from((FontFamily::SansSerif, 15))
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        message.to_string(),
        (
            ((layout.plot.left + layout.plot.right) / 2.0) as i32,
            ((layout.plot.top + layout.plot.bottom) / 2.0) as i32,
        ),
        style,
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Render the decade rate-of-change chart for one region.
///
/// Future rate series are stitched to the historical series' final point the
/// same way the trend chart stitches its lines. When no scenario yields at
/// least one rate bin the chart renders an explicit guidance message instead
/// of empty axes.
pub fn render_rate_chart(
    state: &ChartState,
    data: &Dataset,
    out_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let series = data.region(state.region);
    let hist_bins = bin_by_decade(&series.historical, None);
    let hist_rate = rate_of_change(&hist_bins);

    let mut lines: Vec<(Scenario, Vec<RateBin>)> = Vec::new();
    for scenario in state.active.iter() {
        let rate = if scenario == Scenario::Historical {
            hist_rate.clone()
        } else {
            let mut bins = bin_by_decade(series.scenario(scenario), None);
            if let Some(last) = hist_bins.last() {
                stitch_to_historical(&mut bins, last);
            }
            let mut rate = rate_of_change(&bins);
            if let Some(last) = hist_rate.last() {
                stitch_rate(&mut rate, last);
            }
            rate
        };
        if !rate.is_empty() {
            lines.push((scenario, rate));
        }
    }

    let path_string = out_path.to_string_lossy().to_string();
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_rate_lines(root, state, &lines, width, height)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_rate_lines(root, state, &lines, width, height)?;
    }
    Ok(())
}

fn draw_rate_lines<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    state: &ChartState,
    lines: &[(Scenario, Vec<RateBin>)],
    width: u32,
    height: u32,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let title = format!("{}: Decade Rate of Change", state.region.name());
    root.draw(&Text::new(
        title,
        ((width / 2) as i32, 12),
        TextStyle::from((FontFamily::SansSerif, 18)).pos(Pos::new(HPos::Center, VPos::Top)),
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if lines.is_empty() {
        root.draw(&Text::new(
            "Not enough decades of data to compute a rate of change.",
            ((width / 2) as i32, (height / 2) as i32),
            TextStyle::from((FontFamily::SansSerif, 15)).pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        return Ok(());
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = 0.0f64;
    let mut y_max = 0.0f64;
    for (_, rate) in lines {
        for r in rate {
            x_min = x_min.min(r.year);
            x_max = x_max.max(r.year);
            y_min = y_min.min(r.value);
            y_max = y_max.max(r.value);
        }
    }
    let pad = (types::Y_PAD_FRACTION * (y_max - y_min)).max(Y_PAD_MIN_RATE);
    // A single rate bin collapses the x span; widen it so the axis stays valid.
    if x_max - x_min < 1.0 {
        x_min -= 5.0;
        x_max += 5.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .set_label_area_size(LabelAreaPosition::Left, types::MARGIN_LEFT as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, types::MARGIN_BOTTOM as u32)
        .set_label_area_size(LabelAreaPosition::Right, types::MARGIN_RIGHT as u32)
        .set_label_area_size(LabelAreaPosition::Top, types::MARGIN_TOP as u32)
        .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Δ Precipitation (mm/day per decade)")
        .x_label_formatter(&|v: &f64| format!("{:.0}", v))
        .y_label_formatter(&|v: &f64| format!("{:+.2}", v))
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Zero reference line.
    chart
        .draw_series(LineSeries::new(
            [(x_min, 0.0), (x_max, 0.0)],
            scenario_color(Scenario::Historical).mix(0.4).stroke_width(1),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    for (scenario, rate) in lines {
        chart
            .draw_series(LineSeries::new(
                rate.iter().map(|r| (r.year, r.value)),
                scenario_color(*scenario).stroke_width(2),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Absolute floor for rate chart padding; rates hover near zero.
const Y_PAD_MIN_RATE: f64 = 0.02;

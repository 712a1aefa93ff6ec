//! Stateful chart instance: lifecycle, interactions, and the render surface.
//!
//! The instance owns the loaded [`Dataset`] and the current immutable
//! [`ChartState`]. Every interaction swaps in a new state and recomputes a
//! fresh [`Surface`]; nothing mutates a rendered chart in place.

use anyhow::{Result, bail};
use num_format::{Locale, ToFormattedString};

use crate::impact::{ImpactParams, RegionImpacts, compute_impacts};
use crate::loader::Loader;
use crate::models::{Dataset, Region, Scenario};

use super::layout::ChartLayout;
use super::types::{ChartState, ScenarioSet, YearWindow};

/// Lifecycle of an instance. Failed activation falls back to `Uninitialized`
/// so activation can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Rendered,
}

/// One legend row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub scenario: Scenario,
    pub active: bool,
}

/// Impact panel rows, pre-formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactPanel {
    pub low_farms: String,
    pub low_people: String,
    pub low_damage: String,
    pub high_farms: String,
    pub high_people: String,
    pub high_damage: String,
}

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub region_label: &'static str,
    pub legend: Vec<LegendEntry>,
    pub impact_panel: ImpactPanel,
    pub layout: ChartLayout,
}

/// A live chart bound to one dataset.
#[derive(Debug)]
pub struct ChartInstance {
    phase: Phase,
    state: ChartState,
    params: ImpactParams,
    data: Option<Dataset>,
    width: u32,
    height: u32,
}

impl ChartInstance {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            phase: Phase::Uninitialized,
            state: ChartState::default(),
            params: ImpactParams::default(),
            data: None,
            width,
            height,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Load the dataset and produce the first surface.
    ///
    /// On failure the instance returns to `Uninitialized` and the error is
    /// surfaced to the caller; a later retry starts clean.
    pub fn activate(&mut self, loader: &Loader) -> Result<Surface> {
        self.phase = Phase::Loading;
        match loader.load() {
            Ok(data) => {
                self.data = Some(data);
                self.phase = Phase::Rendered;
                self.surface()
            }
            Err(e) => {
                self.phase = Phase::Uninitialized;
                self.data = None;
                Err(e.into())
            }
        }
    }

    pub fn select_region(&mut self, region: Region) -> Result<Surface> {
        self.state.region = region;
        self.surface()
    }

    /// Cycle to the neighboring region (keyboard navigation).
    pub fn step_region(&mut self, forward: bool) -> Result<Surface> {
        self.state.region = if forward {
            self.state.region.next()
        } else {
            self.state.region.prev()
        };
        self.surface()
    }

    pub fn toggle_scenario(&mut self, scenario: Scenario) -> Result<Surface> {
        self.state.active.toggle(scenario);
        self.surface()
    }

    pub fn set_scenarios(&mut self, active: ScenarioSet) -> Result<Surface> {
        self.state.active = active;
        self.surface()
    }

    pub fn apply_year_window(&mut self, window: YearWindow) -> Result<Surface> {
        self.state.window = window;
        self.surface()
    }

    pub fn reset_year_window(&mut self) -> Result<Surface> {
        self.state.window = YearWindow::FULL;
        self.surface()
    }

    pub fn toggle_regression(&mut self) -> Result<Surface> {
        self.state.show_regression = !self.state.show_regression;
        self.surface()
    }

    /// Recompute the surface from the current state.
    pub fn surface(&self) -> Result<Surface> {
        let Some(data) = &self.data else {
            bail!("chart not activated: no dataset loaded");
        };
        let layout = ChartLayout::compute(&self.state, data, self.width, self.height);
        let impacts = compute_impacts(
            self.state.region,
            data.region(self.state.region),
            &self.params,
        );
        Ok(Surface {
            region_label: self.state.region.name(),
            legend: Scenario::ALL
                .into_iter()
                .map(|s| LegendEntry {
                    scenario: s,
                    active: self.state.active.contains(s),
                })
                .collect(),
            impact_panel: format_impact_panel(&impacts),
            layout,
        })
    }
}

fn format_impact_panel(impacts: &RegionImpacts) -> ImpactPanel {
    ImpactPanel {
        low_farms: format_count(impacts.low.farms),
        low_people: format_count(impacts.low.people),
        low_damage: format_damage(impacts.low.damage_usd),
        high_farms: format_count(impacts.high.farms),
        high_people: format_count(impacts.high.people),
        high_damage: format_damage(impacts.high.damage_usd),
    }
}

/// Round to a whole count and group thousands, e.g. `1,350,000`.
fn format_count(v: f64) -> String {
    (v.round().max(0.0) as u64).to_formatted_string(&Locale::en)
}

/// Whole dollars with a leading `$`, e.g. `$120,000,000`.
fn format_damage(v: f64) -> String {
    format!("${}", (v.round().max(0.0) as u64).to_formatted_string(&Locale::en))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(1_350_000.4), "1,350,000");
        assert_eq!(format_damage(120_000_000.0), "$120,000,000");
    }
}

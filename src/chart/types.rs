//! Chart state and shared constants for the regional precipitation chart.

use crate::models::{Region, Scenario};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Scenario line colors, consistent across every chart in the system.
pub fn scenario_color(scenario: Scenario) -> RGBColor {
    match scenario {
        Scenario::Historical => RGBColor(0x88, 0x88, 0x88),
        Scenario::LowEmission => RGBColor(0x1e, 0x88, 0xe5),
        Scenario::HighEmission => RGBColor(0xe5, 0x39, 0x35),
    }
}

/// Darker companion colors for the dashed trend overlays.
pub fn trend_color(scenario: Scenario) -> RGBColor {
    match scenario {
        Scenario::Historical => RGBColor(0x55, 0x55, 0x55),
        Scenario::LowEmission => RGBColor(0x0d, 0x47, 0xa1),
        Scenario::HighEmission => RGBColor(0xb7, 0x1c, 0x1c),
    }
}

/// Fraction of the visible value range added as y-axis headroom.
pub const Y_PAD_FRACTION: f64 = 0.06;
/// Absolute floor for the y-axis padding.
pub const Y_PAD_MIN: f64 = 0.05;
/// Minimum vertical pixel gap between endpoint labels.
pub const LABEL_MIN_GAP_PX: f64 = 14.0;

/// Plot margins in pixels, matching the reference layout.
pub const MARGIN_TOP: f64 = 40.0;
pub const MARGIN_RIGHT: f64 = 100.0;
pub const MARGIN_BOTTOM: f64 = 40.0;
pub const MARGIN_LEFT: f64 = 90.0;

/// Optional user-chosen year clip window. `None` ends mean "full range".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearWindow {
    pub const FULL: YearWindow = YearWindow {
        start: None,
        end: None,
    };
}

/// Small fixed set over the three scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet(u8);

impl ScenarioSet {
    pub const EMPTY: ScenarioSet = ScenarioSet(0);
    pub const ALL: ScenarioSet = ScenarioSet(0b111);

    fn bit(scenario: Scenario) -> u8 {
        match scenario {
            Scenario::Historical => 0b001,
            Scenario::LowEmission => 0b010,
            Scenario::HighEmission => 0b100,
        }
    }

    pub fn contains(self, scenario: Scenario) -> bool {
        self.0 & Self::bit(scenario) != 0
    }

    pub fn insert(&mut self, scenario: Scenario) {
        self.0 |= Self::bit(scenario);
    }

    pub fn remove(&mut self, scenario: Scenario) {
        self.0 &= !Self::bit(scenario);
    }

    pub fn toggle(&mut self, scenario: Scenario) {
        self.0 ^= Self::bit(scenario);
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Active scenarios in drawing order (historical first).
    pub fn iter(self) -> impl Iterator<Item = Scenario> {
        Scenario::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl Default for ScenarioSet {
    fn default() -> Self {
        ScenarioSet::ALL
    }
}

impl FromIterator<Scenario> for ScenarioSet {
    fn from_iter<I: IntoIterator<Item = Scenario>>(iter: I) -> Self {
        let mut set = ScenarioSet::EMPTY;
        for s in iter {
            set.insert(s);
        }
        set
    }
}

/// Everything the chart needs to render, immutable per redraw.
///
/// Interaction replaces the state and re-renders; nothing mutates a live
/// chart in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub region: Region,
    pub active: ScenarioSet,
    pub window: YearWindow,
    pub show_regression: bool,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            region: Region::Northeast,
            active: ScenarioSet::ALL,
            window: YearWindow::FULL,
            show_regression: true,
        }
    }
}

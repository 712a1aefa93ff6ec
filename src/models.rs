use serde::{Deserialize, Serialize};

/// Conversion factor from precipitation flux (kg/m²/s) to mm/day.
///
/// 1 kg/m²/s equals 1 mm/s of rainfall, so multiplying by the number of
/// seconds per day yields mm/day.
pub const FLUX_TO_MM_PER_DAY: f64 = 86_400.0;

/// Last year of the historical record. Scenario projections begin after it.
pub const HISTORICAL_BOUNDARY_YEAR: i32 = 2014;

/// Emissions scenario a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Historical,
    /// SSP1-2.6-like projection.
    LowEmission,
    /// SSP5-8.5-like projection.
    HighEmission,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Historical,
        Scenario::LowEmission,
        Scenario::HighEmission,
    ];

    /// Human-readable legend label.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Historical => "Historical",
            Scenario::LowEmission => "Low emissions (SSP1-2.6)",
            Scenario::HighEmission => "High emissions (SSP5-8.5)",
        }
    }

    /// Short keyword used by the CLI and host shell.
    pub fn key(self) -> &'static str {
        match self {
            Scenario::Historical => "historical",
            Scenario::LowEmission => "low",
            Scenario::HighEmission => "high",
        }
    }

    pub fn from_key(key: &str) -> Option<Scenario> {
        match key.trim().to_ascii_lowercase().as_str() {
            "historical" | "hist" => Some(Scenario::Historical),
            "low" | "low-emission" | "ssp126" => Some(Scenario::LowEmission),
            "high" | "high-emission" | "ssp585" => Some(Scenario::HighEmission),
            _ => None,
        }
    }

    pub fn is_future(self) -> bool {
        !matches!(self, Scenario::Historical)
    }
}

/// Geographic region covered by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Northeast,
    Midwest,
    South,
    Northwest,
}

impl Region {
    /// Display/navigation order of the region selector.
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Midwest,
        Region::South,
        Region::Northwest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
            Region::South => "South",
            Region::Northwest => "Northwest",
        }
    }

    /// Lowercase key used in data file names and CLI arguments.
    pub fn key(self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Midwest => "midwest",
            Region::South => "south",
            Region::Northwest => "northwest",
        }
    }

    pub fn from_key(key: &str) -> Option<Region> {
        match key.trim().to_ascii_lowercase().as_str() {
            "northeast" => Some(Region::Northeast),
            "midwest" => Some(Region::Midwest),
            "south" => Some(Region::South),
            "northwest" => Some(Region::Northwest),
            _ => None,
        }
    }

    /// Next region in selector order, wrapping around.
    pub fn next(self) -> Region {
        let i = Region::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Region::ALL[(i + 1) % Region::ALL.len()]
    }

    /// Previous region in selector order, wrapping around.
    pub fn prev(self) -> Region {
        let i = Region::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Region::ALL[(i + Region::ALL.len() - 1) % Region::ALL.len()]
    }
}

/// One yearly observation, already converted to mm/day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub year: i32,
    pub value: f64,
}

/// One region's historical record plus its two scenario projections.
/// Each series is sorted ascending by year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionSeries {
    pub historical: Vec<Sample>,
    pub low: Vec<Sample>,
    pub high: Vec<Sample>,
}

impl RegionSeries {
    pub fn scenario(&self, scenario: Scenario) -> &[Sample] {
        match scenario {
            Scenario::Historical => &self.historical,
            Scenario::LowEmission => &self.low,
            Scenario::HighEmission => &self.high,
        }
    }
}

/// Fully loaded dataset: all four regions or nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub northeast: RegionSeries,
    pub midwest: RegionSeries,
    pub south: RegionSeries,
    pub northwest: RegionSeries,
}

impl Dataset {
    pub fn region(&self, region: Region) -> &RegionSeries {
        match region {
            Region::Northeast => &self.northeast,
            Region::Midwest => &self.midwest,
            Region::South => &self.south,
            Region::Northwest => &self.northwest,
        }
    }

    pub fn region_mut(&mut self, region: Region) -> &mut RegionSeries {
        match region {
            Region::Northeast => &mut self.northeast,
            Region::Midwest => &mut self.midwest,
            Region::South => &mut self.south,
            Region::Northwest => &mut self.northwest,
        }
    }

    /// Min/max year across every region and scenario, if any data exists.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut span: Option<(i32, i32)> = None;
        for region in Region::ALL {
            for scenario in Scenario::ALL {
                for s in self.region(region).scenario(scenario) {
                    span = Some(match span {
                        Some((lo, hi)) => (lo.min(s.year), hi.max(s.year)),
                        None => (s.year, s.year),
                    });
                }
            }
        }
        span
    }
}

/// A 10-year bucket reduced to its mean value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecadeBin {
    /// Center year of the bucket (`bin_start + 5`).
    pub year: i32,
    /// Arithmetic mean of the bucket's samples.
    pub value: f64,
    pub bin_start: i32,
    pub bin_end: i32,
    /// Number of samples reduced into this bin; at least 1.
    pub count: usize,
}

/// Per-decade change between two consecutive decade bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBin {
    /// Midpoint between the two bin centers.
    pub year: f64,
    /// Change in mm/day normalized to a 10-year span.
    pub value: f64,
    pub from_year: i32,
    pub to_year: i32,
    pub span_start: i32,
    pub span_end: i32,
}

/// Static exposure counts used by the impact estimator. Illustrative only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureBaseline {
    pub farms: u64,
    pub people: u64,
    pub damage_per_year_usd: f64,
}

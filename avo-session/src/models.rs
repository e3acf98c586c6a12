//! Query result models.
//!
//! All structs derive `Serialize` so they can be written out as JSON or CSV
//! by the command layer or handed to a chart renderer.

use avo_core::region::StateCode;
use avo_core::season::Season;
use avo_data::aggregate::Summary;
use avo_data::resolver::RegionKind;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which fan-out bucket a state view draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateScope {
    /// Regions that map to exactly one state.
    Single,
    /// Regions spanning several states, repeated into each.
    Multi,
}

impl fmt::Display for StateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateScope::Single => "single",
            StateScope::Multi => "multi",
        })
    }
}

impl FromStr for StateScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "single-state" => Ok(StateScope::Single),
            "multi" | "multi-state" => Ok(StateScope::Multi),
            other => Err(format!("unknown state scope '{}'", other)),
        }
    }
}

/// Statistics for one month of year, across all selected years.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthSummary {
    /// Zero-based month.
    pub month: u32,
    pub label: &'static str,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeasonSummary {
    pub season: Season,
    pub summary: Summary,
}

/// Statistics for one region label, with the dates it was observed on.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub kind: RegionKind,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// 1-based position when ranked, otherwise `None`.
    pub rank: Option<usize>,
    pub summary: Summary,
}

/// Statistics for one state in a choropleth view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StateSummary {
    pub state: StateCode,
    /// Full state name used by map features.
    pub name: &'static str,
    pub rank: Option<usize>,
    pub summary: Summary,
}

/// A row of the region resolution table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionInfo {
    pub region: &'static str,
    pub kind: RegionKind,
    pub states: Vec<StateCode>,
}

/// A region label with no state mapping and how many records carried it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnresolvedRegion {
    pub region: String,
    pub records: usize,
}

/// Shape of the loaded dataset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetInfo {
    pub records: usize,
    pub rejected: usize,
    pub epoch_year: i32,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub years: Vec<i32>,
    pub regions: usize,
}

//! Rendering query results as a text table, JSON or CSV.
//!
//! Each result model maps onto a flat display row. `tabled` formats that row
//! for the terminal while the CSV writer serializes its raw values.

use avo_data::aggregate::Summary;
use avo_data::series::{ExtremeKind, YearExtreme};
use avo_session::models::{
    DatasetInfo, MonthSummary, RegionInfo, RegionSummary, SeasonSummary, StateSummary,
    UnresolvedRegion, YearSummary,
};
use avo_utils::dates::format_date;
use avo_utils::numbers::{format_number, format_price};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown-style table with formatted prices and volumes
    #[default]
    Table,
    /// Pretty-printed JSON of the full result models
    Json,
    /// Header row plus raw numeric values
    Csv,
}

/// A result model that flattens into one display row.
pub trait Tabular {
    type Row: Serialize + Tabled;

    fn row(&self) -> Self::Row;
}

/// Write `rows` to `out` in the requested format.
pub fn emit<T, W>(rows: &[T], format: OutputFormat, out: &mut W) -> anyhow::Result<()>
where
    T: Serialize + Tabular,
    W: Write,
{
    match format {
        OutputFormat::Json => emit_json(&rows, out),
        OutputFormat::Csv => {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut *out);
            wtr.write_record(<T::Row as Tabled>::headers().iter().map(|h| h.as_bytes()))?;
            for row in rows {
                wtr.serialize(row.row())?;
            }
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                writeln!(out, "no matching records")?;
                return Ok(());
            }
            let mut table = Table::new(rows.iter().map(T::row));
            table.with(Style::markdown());
            writeln!(out, "{}", table)?;
            Ok(())
        }
    }
}

pub fn emit_json<T: Serialize + ?Sized, W: Write>(value: &T, out: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn price(value: &f64) -> String {
    format_price(*value)
}

fn volume(value: &f64) -> String {
    format_number(*value)
}

fn rank(value: &Option<usize>) -> String {
    value.map_or_else(String::new, |n| n.to_string())
}

/// Declares a display row ending in the shared summary columns.
macro_rules! summary_row {
    ($(#[$doc:meta])* $name:ident { $($(#[$attr:meta])* $field:ident: $ty:ty,)* }) => {
        $(#[$doc])*
        #[derive(Debug, Serialize, Tabled)]
        pub struct $name {
            $($(#[$attr])* pub $field: $ty,)*
            #[tabled(display_with = "price")]
            pub mean_price: f64,
            #[tabled(display_with = "price")]
            pub min_price: f64,
            #[tabled(display_with = "price")]
            pub max_price: f64,
            #[tabled(display_with = "volume")]
            pub total_volume: f64,
            #[tabled(display_with = "volume")]
            pub mean_volume: f64,
            pub years: usize,
            pub count: usize,
        }

        impl $name {
            fn new($($field: $ty,)* summary: &Summary) -> Self {
                $name {
                    $($field,)*
                    mean_price: summary.mean_price,
                    min_price: summary.min_price,
                    max_price: summary.max_price,
                    total_volume: summary.total_volume,
                    mean_volume: summary.mean_volume,
                    years: summary.year_count,
                    count: summary.count,
                }
            }
        }
    };
}

summary_row!(MonthRow {
    month: &'static str,
});

summary_row!(YearRow {
    year: i32,
});

summary_row!(SeasonRow {
    season: &'static str,
});

summary_row!(
    /// Region rows carry the first and last observation dates.
    RegionRow {
        #[tabled(display_with = "rank")]
        rank: Option<usize>,
        region: String,
        first_date: String,
        last_date: String,
    }
);

summary_row!(StateRow {
    #[tabled(display_with = "rank")]
    rank: Option<usize>,
    state: String,
    name: &'static str,
});

impl Tabular for MonthSummary {
    type Row = MonthRow;

    fn row(&self) -> MonthRow {
        MonthRow::new(self.label, &self.summary)
    }
}

impl Tabular for YearSummary {
    type Row = YearRow;

    fn row(&self) -> YearRow {
        YearRow::new(self.year, &self.summary)
    }
}

impl Tabular for SeasonSummary {
    type Row = SeasonRow;

    fn row(&self) -> SeasonRow {
        SeasonRow::new(self.season.name(), &self.summary)
    }
}

impl Tabular for RegionSummary {
    type Row = RegionRow;

    fn row(&self) -> RegionRow {
        RegionRow::new(
            self.rank,
            self.region.clone(),
            format_date(&self.first_date),
            format_date(&self.last_date),
            &self.summary,
        )
    }
}

impl Tabular for StateSummary {
    type Row = StateRow;

    fn row(&self) -> StateRow {
        StateRow::new(self.rank, self.state.to_string(), self.name, &self.summary)
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct ExtremeRow {
    pub year: i32,
    pub kind: &'static str,
    pub date: String,
    pub season: &'static str,
    #[tabled(display_with = "price")]
    pub mean_price: f64,
}

impl Tabular for YearExtreme {
    type Row = ExtremeRow;

    fn row(&self) -> ExtremeRow {
        ExtremeRow {
            year: self.year,
            kind: match self.kind {
                ExtremeKind::Peak => "peak",
                ExtremeKind::Trough => "trough",
            },
            date: format_date(&self.date),
            season: self.season.name(),
            mean_price: self.mean_price,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct RegionInfoRow {
    pub region: &'static str,
    pub kind: String,
    /// Space separated state codes.
    pub states: String,
}

impl Tabular for RegionInfo {
    type Row = RegionInfoRow;

    fn row(&self) -> RegionInfoRow {
        let states: Vec<&str> = self.states.iter().map(|s| s.as_str()).collect();
        RegionInfoRow {
            region: self.region,
            kind: format!("{:?}", self.kind),
            states: states.join(" "),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct UnresolvedRow {
    #[serde(rename = "unresolved_region")]
    #[tabled(rename = "unresolved_region")]
    pub region: String,
    pub records: usize,
}

impl Tabular for UnresolvedRegion {
    type Row = UnresolvedRow;

    fn row(&self) -> UnresolvedRow {
        UnresolvedRow {
            region: self.region.clone(),
            records: self.records,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct InfoRow {
    pub records: usize,
    pub rejected: usize,
    pub epoch_year: i32,
    pub first_date: String,
    pub last_date: String,
    pub years: String,
    pub regions: usize,
}

impl Tabular for DatasetInfo {
    type Row = InfoRow;

    fn row(&self) -> InfoRow {
        let date = |d: Option<chrono::NaiveDate>| d.map_or_else(String::new, |d| format_date(&d));
        let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
        InfoRow {
            records: self.records,
            rejected: self.rejected,
            epoch_year: self.epoch_year,
            first_date: date(self.first_date),
            last_date: date(self.last_date),
            years: years.join(" "),
            regions: self.regions,
        }
    }
}

//! Core types and dataset loading for weekly avocado price and volume data.
//!
//! A [`dataset::Dataset`] is loaded once from the published CSV and holds
//! immutable [`record::Record`]s. Region labels are resolved to US states
//! through the static table in [`region`].

pub mod dataset;
pub mod error;
#[cfg(feature = "api")]
pub mod fetch;
pub mod month_index;
pub mod record;
pub mod region;
pub mod season;

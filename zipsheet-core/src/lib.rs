//! Core library for the `zipsheet` CLI.
//!
//! This crate defines:
//! - A workbook of named sheets and the fixed forecast layout
//! - Postal code and forecast lookups behind async traits
//! - The refresh sequence that fills the workbook, and its on-open trigger
//! - Configuration handling
//!
//! It is used by `zipsheet-cli`, but any host holding a [`Workbook`] can
//! drive a [`Refresher`].

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod provider;
pub mod refresh;
pub mod sheet;
pub mod table;
pub mod trigger;
pub mod workbook;

pub use config::Config;
pub use error::{InputError, LookupError, RefreshError, SheetError};
pub use model::{CurrentConditions, DailySeries, Forecast, HourlySeries, Location};
pub use provider::{ForecastSource, Geocoder};
pub use refresh::{RefreshReport, Refresher};
pub use sheet::{CellRef, CellValue, Grid, Sheet};
pub use trigger::{install_on_open_trigger, open_workbook};
pub use workbook::Workbook;

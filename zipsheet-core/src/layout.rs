//! Fixed workbook layout: sheet names, cell addresses and headers.

use crate::sheet::CellRef;

pub const INTERFACE_SHEET: &str = "interface";
pub const HOURLY_SHEET: &str = "hourly";
pub const DAILY_SHEET: &str = "daily";

/// Postal code input (D2).
pub const POSTAL_CODE_CELL: CellRef = CellRef::new(2, 4);
/// "Weather for ..." banner (B6).
pub const BANNER_CELL: CellRef = CellRef::new(6, 2);
pub const TEMPERATURE_CELL: CellRef = CellRef::new(10, 4);
pub const APPARENT_TEMPERATURE_CELL: CellRef = CellRef::new(12, 4);
pub const PRECIPITATION_CELL: CellRef = CellRef::new(14, 4);
pub const HUMIDITY_CELL: CellRef = CellRef::new(16, 4);

/// Data rows start below the header row.
pub const FIRST_DATA_ROW: usize = 2;

/// Label cells written next to the interface values (column B).
pub const INTERFACE_LABELS: [(CellRef, &str); 5] = [
    (CellRef::new(2, 2), "Zip Code"),
    (CellRef::new(10, 2), "Temperature"),
    (CellRef::new(12, 2), "Feels Like"),
    (CellRef::new(14, 2), "Precipitation"),
    (CellRef::new(16, 2), "Humidity"),
];

pub const HOURLY_HEADERS: [&str; 8] = [
    "Time",
    "Temperature (°F)",
    "Feels Like (°F)",
    "Precip Chance (%)",
    "Precip (in)",
    "Humidity (%)",
    "Wind (mph)",
    "Gusts (mph)",
];

pub const DAILY_HEADERS: [&str; 7] = [
    "Date",
    "High (°F)",
    "Low (°F)",
    "Feels Like High (°F)",
    "Feels Like Low (°F)",
    "Precip (in)",
    "Max Wind (mph)",
];

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::sheet::CellValue;

/// A geocoded postal code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `"<place name>, <state abbreviation>"`
    pub display_name: String,
}

/// Instantaneous conditions, in Fahrenheit, inches and percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_f: f64,
    pub apparent_temperature_f: f64,
    pub precipitation_in: f64,
    pub relative_humidity_pct: f64,
}

/// One entry per forecast hour, all columns the same length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<NaiveDateTime>,
    pub temperature_f: Vec<Option<f64>>,
    pub apparent_temperature_f: Vec<Option<f64>>,
    pub precipitation_probability_pct: Vec<Option<f64>>,
    pub precipitation_in: Vec<Option<f64>>,
    pub relative_humidity_pct: Vec<Option<f64>>,
    pub wind_speed_mph: Vec<Option<f64>>,
    pub wind_gusts_mph: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Columns in hourly sheet order (A..H).
    pub fn into_columns(self) -> Vec<Vec<CellValue>> {
        vec![
            self.time.into_iter().map(CellValue::from).collect(),
            numbers(self.temperature_f),
            numbers(self.apparent_temperature_f),
            numbers(self.precipitation_probability_pct),
            numbers(self.precipitation_in),
            numbers(self.relative_humidity_pct),
            numbers(self.wind_speed_mph),
            numbers(self.wind_gusts_mph),
        ]
    }
}

/// One entry per forecast day; `date` holds local midnight of each day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySeries {
    pub date: Vec<NaiveDateTime>,
    pub temperature_max_f: Vec<Option<f64>>,
    pub temperature_min_f: Vec<Option<f64>>,
    pub apparent_temperature_max_f: Vec<Option<f64>>,
    pub apparent_temperature_min_f: Vec<Option<f64>>,
    pub precipitation_sum_in: Vec<Option<f64>>,
    pub wind_speed_max_mph: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }

    /// Columns in daily sheet order (A..G).
    pub fn into_columns(self) -> Vec<Vec<CellValue>> {
        vec![
            self.date.into_iter().map(CellValue::from).collect(),
            numbers(self.temperature_max_f),
            numbers(self.temperature_min_f),
            numbers(self.apparent_temperature_max_f),
            numbers(self.apparent_temperature_min_f),
            numbers(self.precipitation_sum_in),
            numbers(self.wind_speed_max_mph),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

fn numbers(values: Vec<Option<f64>>) -> Vec<CellValue> {
    values.into_iter().map(CellValue::from).collect()
}

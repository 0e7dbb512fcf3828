//! The refresh sequence: postal code in, summary cells and forecast tables out.

use chrono::{Local, NaiveDateTime};

use crate::{
    Config,
    error::{InputError, RefreshError},
    layout::{
        APPARENT_TEMPERATURE_CELL, BANNER_CELL, DAILY_SHEET, FIRST_DATA_ROW, HOURLY_SHEET,
        HUMIDITY_CELL, INTERFACE_SHEET, POSTAL_CODE_CELL, PRECIPITATION_CELL, TEMPERATURE_CELL,
    },
    model::CurrentConditions,
    provider::{ForecastSource, Geocoder, clients_from_config},
    sheet::{CellValue, Sheet, format_number},
    table::{prune_stale_rows, write_column},
    workbook::Workbook,
};

/// What a completed refresh wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub place: String,
    pub hourly_rows: usize,
    pub pruned_rows: usize,
    pub daily_rows: usize,
}

/// Drives the geocoding and forecast lookups and writes their results.
#[derive(Debug)]
pub struct Refresher {
    geocoder: Box<dyn Geocoder>,
    forecasts: Box<dyn ForecastSource>,
}

impl Refresher {
    pub fn new(
        geocoder: impl Geocoder + 'static,
        forecasts: impl ForecastSource + 'static,
    ) -> Self {
        Self { geocoder: Box::new(geocoder), forecasts: Box::new(forecasts) }
    }

    pub fn from_config(config: &Config) -> Self {
        let (geocoder, forecasts) = clients_from_config(config);
        Self::new(geocoder, forecasts)
    }

    /// Refresh against the host's current local time.
    pub async fn refresh(&self, workbook: &mut Workbook) -> Result<RefreshReport, RefreshError> {
        self.refresh_at(workbook, Local::now().naive_local()).await
    }

    /// Run the full refresh, pruning hourly rows older than `now`.
    ///
    /// Any failure stops the sequence where it is. Cells already written
    /// stay written: a forecast failure leaves the new banner in place.
    pub async fn refresh_at(
        &self,
        workbook: &mut Workbook,
        now: NaiveDateTime,
    ) -> Result<RefreshReport, RefreshError> {
        let postal_code = read_postal_code(workbook.sheet(INTERFACE_SHEET)?)?;
        tracing::info!(%postal_code, "refreshing forecast");

        let location = self.geocoder.resolve(&postal_code).await?;

        let interface = workbook.sheet_mut(INTERFACE_SHEET)?;
        interface.set_value(BANNER_CELL, format!("Weather for {}", location.display_name).into());

        let forecast = self.forecasts.resolve(location.latitude, location.longitude).await?;

        let interface = workbook.sheet_mut(INTERFACE_SHEET)?;
        write_current(interface, &forecast.current);

        let hourly_rows = forecast.hourly.len();
        let hourly = workbook.sheet_mut(HOURLY_SHEET)?;
        warn_if_shrinking(&*hourly, hourly_rows);
        for (i, column) in forecast.hourly.into_columns().into_iter().enumerate() {
            write_column(hourly, i + 1, column);
        }
        let pruned_rows = prune_stale_rows(hourly, now)?;

        let daily_rows = forecast.daily.len();
        let daily = workbook.sheet_mut(DAILY_SHEET)?;
        warn_if_shrinking(&*daily, daily_rows);
        for (i, column) in forecast.daily.into_columns().into_iter().enumerate() {
            write_column(daily, i + 1, column);
        }

        let report =
            RefreshReport { place: location.display_name, hourly_rows, pruned_rows, daily_rows };
        tracing::info!(
            place = %report.place,
            hourly = report.hourly_rows,
            pruned = report.pruned_rows,
            daily = report.daily_rows,
            "refresh complete"
        );
        Ok(report)
    }
}

/// Read the postal code from the input cell.
///
/// Text is trimmed. A whole number (what a spreadsheet makes of `02134`) is
/// zero-padded back to five digits.
pub fn read_postal_code<S>(sheet: &S) -> Result<String, InputError>
where
    S: Sheet + ?Sized,
{
    let cell = POSTAL_CODE_CELL.to_string();
    let raw = match sheet.value(POSTAL_CODE_CELL) {
        CellValue::Empty => return Err(InputError::Empty { cell }),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) if n.fract() == 0.0 && (0.0..100_000.0).contains(&n) => {
            format!("{:05}", n as u32)
        }
        other => return Err(InputError::Invalid { cell, value: other.to_string() }),
    };

    if raw.is_empty() {
        return Err(InputError::Empty { cell });
    }
    if raw.len() != 5 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::Invalid { cell, value: raw });
    }
    Ok(raw)
}

fn write_current<S>(sheet: &mut S, current: &CurrentConditions)
where
    S: Sheet + ?Sized,
{
    let precipitation = format!("{} in", format_number(current.precipitation_in));
    let humidity = format!("{} %", format_number(current.relative_humidity_pct));

    sheet.set_value(TEMPERATURE_CELL, format_degrees(current.temperature_f).into());
    sheet.set_value(APPARENT_TEMPERATURE_CELL, format_degrees(current.apparent_temperature_f).into());
    sheet.set_value(PRECIPITATION_CELL, precipitation.into());
    sheet.set_value(HUMIDITY_CELL, humidity.into());
}

/// `72.4` -> `72°F`. Halves round up, so `-2.5` -> `-2°F`.
pub fn format_degrees(value: f64) -> String {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    format!("{}°F", format_number(rounded))
}

fn warn_if_shrinking<S>(sheet: &S, incoming: usize)
where
    S: Sheet + ?Sized,
{
    let existing = sheet.data_range().len().saturating_sub(FIRST_DATA_ROW - 1);
    if existing > incoming {
        tracing::warn!(
            sheet = sheet.name(),
            existing,
            incoming,
            "new series is shorter than the table; trailing rows keep old values"
        );
    }
}

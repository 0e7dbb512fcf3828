use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::DEFAULT_FORECAST_BASE_URL,
    error::LookupError,
    model::{CurrentConditions, DailySeries, Forecast, HourlySeries},
    provider::{fetch_json, require},
};

use super::ForecastSource;

const SERVICE: &str = "Open-Meteo";

pub const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation";
pub const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation_probability,precipitation,wind_speed_10m,wind_gusts_10m";
pub const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,apparent_temperature_max,\
apparent_temperature_min,precipitation_sum,wind_speed_10m_max";
pub const FORECAST_DAYS: u32 = 14;

/// 14-day forecasts from the Open-Meteo API in Fahrenheit, mph and inches.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self) -> String {
        format!("{}/v1/forecast", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_BASE_URL)
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: Option<OmCurrent>,
    hourly: Option<OmHourly>,
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    precipitation: Option<f64>,
}

type Column = Option<Vec<Option<f64>>>;

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Option<Vec<String>>,
    temperature_2m: Column,
    relative_humidity_2m: Column,
    apparent_temperature: Column,
    precipitation_probability: Column,
    precipitation: Column,
    wind_speed_10m: Column,
    wind_gusts_10m: Column,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Option<Vec<String>>,
    temperature_2m_max: Column,
    temperature_2m_min: Column,
    apparent_temperature_max: Column,
    apparent_temperature_min: Column,
    precipitation_sum: Column,
    wind_speed_10m_max: Column,
}

/// Parse an hourly timestamp such as `2024-03-01T13:00` as wall-clock time.
pub fn parse_hour(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Parse a daily date such as `2024-03-01` as midnight of that local day.
pub fn parse_day(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN))
}

fn times(
    field: &str,
    values: Option<Vec<String>>,
    parse: fn(&str) -> Option<NaiveDateTime>,
) -> Result<Vec<NaiveDateTime>, LookupError> {
    require(SERVICE, field, values)?
        .into_iter()
        .map(|raw| {
            parse(&raw).ok_or_else(|| LookupError::InvalidField {
                service: SERVICE,
                field: field.to_string(),
                value: raw,
            })
        })
        .collect()
}

fn aligned(field: &str, values: Column, expected: usize) -> Result<Vec<Option<f64>>, LookupError> {
    let values = require(SERVICE, field, values)?;
    if values.len() != expected {
        return Err(LookupError::MisalignedSeries {
            service: SERVICE,
            field: field.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

fn into_current(current: Option<OmCurrent>) -> Result<CurrentConditions, LookupError> {
    let c = require(SERVICE, "current", current)?;
    Ok(CurrentConditions {
        temperature_f: require(SERVICE, "current.temperature_2m", c.temperature_2m)?,
        apparent_temperature_f: require(
            SERVICE,
            "current.apparent_temperature",
            c.apparent_temperature,
        )?,
        precipitation_in: require(SERVICE, "current.precipitation", c.precipitation)?,
        relative_humidity_pct: require(
            SERVICE,
            "current.relative_humidity_2m",
            c.relative_humidity_2m,
        )?,
    })
}

fn into_hourly(hourly: Option<OmHourly>) -> Result<HourlySeries, LookupError> {
    let h = require(SERVICE, "hourly", hourly)?;
    let time = times("hourly.time", h.time, parse_hour)?;
    let n = time.len();

    Ok(HourlySeries {
        temperature_f: aligned("hourly.temperature_2m", h.temperature_2m, n)?,
        apparent_temperature_f: aligned("hourly.apparent_temperature", h.apparent_temperature, n)?,
        precipitation_probability_pct: aligned(
            "hourly.precipitation_probability",
            h.precipitation_probability,
            n,
        )?,
        precipitation_in: aligned("hourly.precipitation", h.precipitation, n)?,
        relative_humidity_pct: aligned("hourly.relative_humidity_2m", h.relative_humidity_2m, n)?,
        wind_speed_mph: aligned("hourly.wind_speed_10m", h.wind_speed_10m, n)?,
        wind_gusts_mph: aligned("hourly.wind_gusts_10m", h.wind_gusts_10m, n)?,
        time,
    })
}

fn into_daily(daily: Option<OmDaily>) -> Result<DailySeries, LookupError> {
    let d = require(SERVICE, "daily", daily)?;
    let date = times("daily.time", d.time, parse_day)?;
    let n = date.len();

    Ok(DailySeries {
        temperature_max_f: aligned("daily.temperature_2m_max", d.temperature_2m_max, n)?,
        temperature_min_f: aligned("daily.temperature_2m_min", d.temperature_2m_min, n)?,
        apparent_temperature_max_f: aligned(
            "daily.apparent_temperature_max",
            d.apparent_temperature_max,
            n,
        )?,
        apparent_temperature_min_f: aligned(
            "daily.apparent_temperature_min",
            d.apparent_temperature_min,
            n,
        )?,
        precipitation_sum_in: aligned("daily.precipitation_sum", d.precipitation_sum, n)?,
        wind_speed_max_mph: aligned("daily.wind_speed_10m_max", d.wind_speed_10m_max, n)?,
        date,
    })
}

fn into_forecast(parsed: OmResponse) -> Result<Forecast, LookupError> {
    Ok(Forecast {
        current: into_current(parsed.current)?,
        hourly: into_hourly(parsed.hourly)?,
        daily: into_daily(parsed.daily)?,
    })
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<Forecast, LookupError> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let forecast_days = FORECAST_DAYS.to_string();
        tracing::debug!(%latitude, %longitude, "requesting forecast");

        let request = self.http.get(self.url()).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", CURRENT_FIELDS),
            ("hourly", HOURLY_FIELDS),
            ("daily", DAILY_FIELDS),
            ("timezone", "auto"),
            ("forecast_days", forecast_days.as_str()),
            ("temperature_unit", "fahrenheit"),
            ("wind_speed_unit", "mph"),
            ("precipitation_unit", "inch"),
        ]);

        let parsed: OmResponse = fetch_json(SERVICE, request).await?;
        let forecast = into_forecast(parsed)?;

        tracing::info!(
            hours = forecast.hourly.len(),
            days = forecast.daily.len(),
            "received forecast"
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "current": {
                "temperature_2m": 72.4,
                "relative_humidity_2m": 65,
                "apparent_temperature": 74.6,
                "precipitation": 0.0
            },
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [50.1, 49.8],
                "relative_humidity_2m": [80, 82],
                "apparent_temperature": [47.0, 46.5],
                "precipitation_probability": [10, null],
                "precipitation": [0.0, 0.01],
                "wind_speed_10m": [5.2, 4.9],
                "wind_gusts_10m": [11.0, 10.3]
            },
            "daily": {
                "time": ["2024-03-01"],
                "temperature_2m_max": [58.0],
                "temperature_2m_min": [41.0],
                "apparent_temperature_max": [55.0],
                "apparent_temperature_min": [37.0],
                "precipitation_sum": [0.12],
                "wind_speed_10m_max": [14.2]
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<Forecast, LookupError> {
        into_forecast(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn parses_full_response() {
        let forecast = parse(sample()).unwrap();

        assert_eq!(forecast.current.temperature_f, 72.4);
        assert_eq!(forecast.current.relative_humidity_pct, 65.0);
        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.hourly.precipitation_probability_pct, vec![Some(10.0), None]);
        assert_eq!(forecast.daily.len(), 1);
        assert_eq!(forecast.daily.wind_speed_max_mph, vec![Some(14.2)]);
    }

    #[test]
    fn daily_date_is_local_midnight() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_day("2024-03-01"), Some(expected));

        let forecast = parse(sample()).unwrap();
        assert_eq!(forecast.daily.date, vec![expected]);
    }

    #[test]
    fn hourly_time_keeps_wall_clock() {
        let t = parse_hour("2024-03-01T13:00").unwrap();
        assert_eq!(t.to_string(), "2024-03-01 13:00:00");
        let with_seconds = parse_hour("2024-03-01T13:00:30").unwrap();
        assert_eq!(with_seconds.to_string(), "2024-03-01 13:00:30");
        assert_eq!(parse_hour("yesterday"), None);
    }

    #[test]
    fn missing_current_field_is_named() {
        let mut value = sample();
        value["current"].as_object_mut().unwrap().remove("apparent_temperature");

        let err = parse(value).unwrap_err();
        assert!(matches!(
            err,
            LookupError::MissingField { ref field, .. } if field == "current.apparent_temperature"
        ));
    }

    #[test]
    fn missing_section_is_named() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("daily");

        let err = parse(value).unwrap_err();
        assert!(matches!(err, LookupError::MissingField { ref field, .. } if field == "daily"));
    }

    #[test]
    fn short_column_is_misaligned() {
        let mut value = sample();
        value["hourly"]["wind_gusts_10m"] = json!([11.0]);

        let err = parse(value).unwrap_err();
        assert!(matches!(
            err,
            LookupError::MisalignedSeries { ref field, expected: 2, actual: 1, .. }
                if field == "hourly.wind_gusts_10m"
        ));
    }

    #[test]
    fn bad_timestamp_is_invalid() {
        let mut value = sample();
        value["daily"]["time"] = json!(["March 1st"]);

        let err = parse(value).unwrap_err();
        assert!(matches!(err, LookupError::InvalidField { ref value, .. } if value == "March 1st"));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::DEFAULT_GEOCODING_BASE_URL,
    error::LookupError,
    model::Location,
    provider::{fetch_json, require},
};

use super::Geocoder;

const SERVICE: &str = "Zippopotam";
const COUNTRY: &str = "us";

/// Postal code lookups against the Zippopotam.us API.
#[derive(Debug, Clone)]
pub struct ZippopotamClient {
    base_url: String,
    http: Client,
}

impl ZippopotamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, postal_code: &str) -> String {
        format!("{}/{COUNTRY}/{postal_code}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ZippopotamClient {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODING_BASE_URL)
    }
}

#[derive(Debug, Deserialize)]
struct ZpResponse {
    places: Option<Vec<ZpPlace>>,
}

#[derive(Debug, Deserialize)]
struct ZpPlace {
    latitude: Option<ZpCoordinate>,
    longitude: Option<ZpCoordinate>,
    #[serde(rename = "place name")]
    place_name: Option<String>,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: Option<String>,
}

/// Zippopotam sends coordinates as strings; accept bare numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZpCoordinate {
    Number(f64),
    Text(String),
}

impl ZpCoordinate {
    fn to_f64(&self, field: &str) -> Result<f64, LookupError> {
        match self {
            ZpCoordinate::Number(n) => Ok(*n),
            ZpCoordinate::Text(s) => s.trim().parse().map_err(|_| LookupError::InvalidField {
                service: SERVICE,
                field: field.to_string(),
                value: s.clone(),
            }),
        }
    }
}

fn into_location(postal_code: &str, parsed: ZpResponse) -> Result<Location, LookupError> {
    let places = require(SERVICE, "places", parsed.places)?;

    // A postal code can span several localities; only the first is used.
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NoPlaces { postal_code: postal_code.to_string() })?;

    let latitude = require(SERVICE, "places[0].latitude", place.latitude)?
        .to_f64("places[0].latitude")?;
    let longitude = require(SERVICE, "places[0].longitude", place.longitude)?
        .to_f64("places[0].longitude")?;
    let place_name = require(SERVICE, "places[0].place name", place.place_name)?;
    let state = require(SERVICE, "places[0].state abbreviation", place.state_abbreviation)?;

    Ok(Location {
        postal_code: postal_code.to_string(),
        latitude,
        longitude,
        display_name: format!("{place_name}, {state}"),
    })
}

#[async_trait]
impl Geocoder for ZippopotamClient {
    async fn resolve(&self, postal_code: &str) -> Result<Location, LookupError> {
        let url = self.url(postal_code);
        tracing::debug!(%url, "geocoding postal code");

        let parsed: ZpResponse = fetch_json(SERVICE, self.http.get(&url)).await?;
        let location = into_location(postal_code, parsed)?;

        tracing::info!(
            postal_code,
            place = %location.display_name,
            latitude = location.latitude,
            longitude = location.longitude,
            "resolved postal code"
        );
        Ok(location)
    }
}

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    Config,
    error::{LookupError, truncate_body},
    model::{Forecast, Location},
    provider::{open_meteo::OpenMeteoClient, zippopotam::ZippopotamClient},
};

pub mod open_meteo;
pub mod zippopotam;

/// Resolves a postal code to a coordinate and display name.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, postal_code: &str) -> Result<Location, LookupError>;
}

/// Resolves a coordinate to current, hourly and daily forecast data.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<Forecast, LookupError>;
}

/// Construct both lookup clients from the configured endpoints.
pub fn clients_from_config(config: &Config) -> (ZippopotamClient, OpenMeteoClient) {
    (
        ZippopotamClient::new(config.geocoding_base_url()),
        OpenMeteoClient::new(config.forecast_base_url()),
    )
}

/// Send `request`, require a 2xx status and decode the JSON body.
pub(crate) async fn fetch_json<T>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, LookupError>
where
    T: DeserializeOwned,
{
    let res = request
        .send()
        .await
        .map_err(|source| LookupError::Transport { service, source })?;

    let status = res.status();
    let body = res.text().await.map_err(|source| LookupError::Transport { service, source })?;

    if !status.is_success() {
        return Err(LookupError::Status {
            service,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| LookupError::Decode { service, source })
}

/// Unwrap a field the response must carry.
pub(crate) fn require<T>(
    service: &'static str,
    field: &str,
    value: Option<T>,
) -> Result<T, LookupError> {
    value.ok_or_else(|| LookupError::MissingField { service, field: field.to_string() })
}

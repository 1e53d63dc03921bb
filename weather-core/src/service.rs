//! The `/weather` lookup pipeline.
//!
//! Steps run strictly in order and the first failure ends the request:
//! validate postal code, resolve locality, check the API key, fetch the
//! temperature, convert it.

use std::sync::Arc;

use crate::{
    cep::PostalCode,
    error::LookupError,
    model::ConvertedTemperature,
    provider::{LocalityResolver, WeatherProvider},
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: Arc<dyn LocalityResolver>,
    weather: Arc<dyn WeatherProvider>,
    api_key: Option<String>,
}

impl WeatherService {
    /// An empty `api_key` is treated like a missing one.
    pub fn new(
        resolver: Arc<dyn LocalityResolver>,
        weather: Arc<dyn WeatherProvider>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            resolver,
            weather,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub async fn lookup(&self, cep: &str) -> Result<ConvertedTemperature, LookupError> {
        let code = PostalCode::parse(cep).ok_or_else(|| {
            tracing::debug!(cep, "rejected malformed postal code");
            LookupError::InvalidPostalCode
        })?;

        let locality = self.resolver.resolve_locality(&code).await.map_err(|err| {
            tracing::warn!(cep = %code, error = %err, "locality lookup failed");
            LookupError::LocalityNotFound(err)
        })?;

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::warn!("weather API key is not configured");
            LookupError::MissingApiKey
        })?;

        let celsius = self
            .weather
            .current_temperature(&locality, api_key)
            .await
            .map_err(|err| {
                tracing::warn!(%locality, error = %err, "weather lookup failed");
                LookupError::WeatherFetch(err)
            })?;

        tracing::debug!(cep = %code, %locality, celsius, "weather lookup succeeded");

        Ok(ConvertedTemperature::from_celsius(celsius))
    }
}

use crate::{
    Config, PostalCode,
    error::{LocalityError, WeatherError},
    provider::{viacep::ViaCepResolver, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod viacep;
pub mod weatherapi;

/// Resolves a postal code to a locality (city) name.
#[async_trait]
pub trait LocalityResolver: Send + Sync + Debug {
    /// Returns the trimmed locality name. A not-found answer and an empty name are both
    /// [`LocalityError::NotFound`].
    async fn resolve_locality(&self, code: &PostalCode) -> Result<String, LocalityError>;
}

/// Fetches the current temperature, in Celsius, for a locality.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `api_key` is expected to be non-empty; the caller checks that before calling.
    async fn current_temperature(
        &self,
        locality: &str,
        api_key: &str,
    ) -> Result<f64, WeatherError>;
}

/// Build the HTTP client shared by both providers.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Construct the production resolver and weather provider from config.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(ViaCepResolver, WeatherApiProvider)> {
    let http = http_client(config)?;

    let resolver = ViaCepResolver::with_client(http.clone(), config.viacep_base_url());
    let weather = WeatherApiProvider::with_client(http, config.weatherapi_base_url());

    Ok((resolver, weather))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::WeatherError, provider::truncate_body};

use super::WeatherProvider;

/// [`WeatherProvider`] backed by WeatherAPI.com's current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// A missing or null `current` block or `temp_c` field reads as 0.0 rather than failing.
#[derive(Debug, Deserialize)]
struct WaCurrent {
    #[serde(default)]
    temp_c: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    #[serde(default)]
    current: Option<WaCurrent>,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current_temperature(
        &self,
        locality: &str,
        api_key: &str,
    ) -> Result<f64, WeatherError> {
        let url = format!("{}/v1/current.json", self.base_url);

        // `query` percent-encodes the locality, which may hold spaces and accents.
        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", locality), ("lang", "pt")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "WeatherAPI returned non-success status");
            return Err(WeatherError::Status(status));
        }

        let parsed: WaResponse = serde_json::from_str(&body).map_err(WeatherError::Parse)?;

        Ok(parsed.current.and_then(|c| c.temp_c).unwrap_or_default())
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while resolving a postal code to a locality.
#[derive(Debug, Error)]
pub enum LocalityError {
    #[error("locality lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("locality lookup returned status {0}")]
    Status(StatusCode),
    #[error("failed to parse locality lookup response: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("postal code not found")]
    NotFound,
}

/// Failure while fetching the current temperature for a locality.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather provider returned status {0}")]
    Status(StatusCode),
    #[error("failed to parse weather response: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Terminal outcome of a failed `/weather` lookup.
///
/// Every variant maps to exactly one HTTP status and a fixed public message.
/// The wrapped source errors are for logs only.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid postal code")]
    InvalidPostalCode,
    #[error("locality not found: {0}")]
    LocalityNotFound(#[source] LocalityError),
    #[error("weather API key is not configured")]
    MissingApiKey,
    #[error("weather fetch failed: {0}")]
    WeatherFetch(#[source] WeatherError),
}

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::InvalidPostalCode => StatusCode::UNPROCESSABLE_ENTITY,
            LookupError::LocalityNotFound(_) => StatusCode::NOT_FOUND,
            LookupError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            LookupError::WeatherFetch(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message sent to the caller. Never includes upstream detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            LookupError::InvalidPostalCode => "invalid zipcode",
            LookupError::LocalityNotFound(_) => "can not find zipcode",
            LookupError::MissingApiKey => "weather api key not set",
            LookupError::WeatherFetch(_) => "error fetching weather",
        }
    }
}

//! HTTP routes.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use cep_weather_core::{LookupError, WeatherService};
use tower_http::trace::TraceLayer;

/// Create all HTTP routes.
pub fn routes(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(weather))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "OK"
}

/// `GET /weather?cep=01310100`
///
/// Query pairs are kept in order so a repeated `cep` resolves to its first value.
/// The JSON body ends with a newline.
async fn weather(
    State(service): State<Arc<WeatherService>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let cep = params
        .iter()
        .find(|(key, _)| key == "cep")
        .map_or("", |(_, value)| value.as_str());

    let temperature = service.lookup(cep).await?;

    let mut body = serde_json::to_string(&temperature).map_err(ApiError::Encode)?;
    body.push('\n');

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}

/// Plain-text error response; the body is the public message plus a newline.
#[derive(Debug)]
pub enum ApiError {
    Lookup(LookupError),
    Encode(serde_json::Error),
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        ApiError::Lookup(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Lookup(e) => (e.status_code(), e.public_message()),
            ApiError::Encode(e) => {
                tracing::error!(error = %e, "failed to encode weather response");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };
        let body = format!("{message}\n");

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        response
    }
}

//! Core library for the `cep-weather` service.
//!
//! This crate defines:
//! - Postal code (CEP) validation
//! - Abstractions over the locality resolver and the weather provider,
//!   with HTTP implementations for ViaCEP and WeatherAPI.com
//! - The lookup pipeline and its error taxonomy
//! - Configuration & credentials handling
//!
//! It is used by `cep-weather-server`, but carries no HTTP server code of its own.

pub mod cep;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use cep::{PostalCode, is_valid_postal_code};
pub use config::Config;
pub use error::{LocalityError, LookupError, WeatherError};
pub use model::ConvertedTemperature;
pub use provider::{LocalityResolver, WeatherProvider};
pub use service::WeatherService;

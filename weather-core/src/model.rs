use serde::{Deserialize, Serialize};

/// Offset between Celsius and Kelvin used by the API.
///
/// The service has always answered with `C + 273`, and clients compare
/// against that value, so the whole-degree offset is kept.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Temperature in the three scales returned by `GET /weather`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTemperature {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
}

impl ConvertedTemperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + KELVIN_OFFSET,
        }
    }
}

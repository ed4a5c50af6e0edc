use serde::{Deserialize, Serialize};

use crate::error::YrError;

pub const DEFAULT_TEXT_FORECAST: &str = "land";
pub const DEFAULT_LANGUAGE: &str = "nb";

/// Coordinates for a location forecast.
///
/// Both fields are required when the request is made; a missing one is
/// reported as a validation error instead of reaching the network.
/// `[lat, lon]` arrays and `(lat, lon)` tuples convert into this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationArgs {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationArgs {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude: Some(latitude), longitude: Some(longitude) }
    }

    pub fn latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    /// Returns `(latitude, longitude)` or the validation error for this request.
    pub fn validate(&self) -> Result<(f64, f64), YrError> {
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            return Err(YrError::missing_coordinates());
        };

        if !lat.is_finite() || !lon.is_finite() {
            return Err(YrError::Validation(format!(
                "latitude and longitude must be finite numbers, got {lat}, {lon}"
            )));
        }

        Ok((lat, lon))
    }

    /// Query pairs in the order the API documents them: `lon` then `lat`.
    pub(crate) fn query_pairs(&self) -> Result<[(&'static str, String); 2], YrError> {
        let (lat, lon) = self.validate()?;
        Ok([("lon", lon.to_string()), ("lat", lat.to_string())])
    }
}

impl From<[f64; 2]> for LocationArgs {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        LocationArgs::new(latitude, longitude)
    }
}

impl From<(f64, f64)> for LocationArgs {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        LocationArgs::new(latitude, longitude)
    }
}

/// Parameters for a text forecast. Unset fields fall back to
/// [`DEFAULT_TEXT_FORECAST`] and [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextForecastArgs {
    pub forecast: Option<String>,
    pub language: Option<String>,
}

impl TextForecastArgs {
    pub fn forecast(mut self, forecast: impl Into<String>) -> Self {
        self.forecast = Some(forecast.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn forecast_or_default(&self) -> &str {
        self.forecast.as_deref().unwrap_or(DEFAULT_TEXT_FORECAST)
    }

    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub(crate) fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [("forecast", self.forecast_or_default()), ("language", self.language_or_default())]
    }
}

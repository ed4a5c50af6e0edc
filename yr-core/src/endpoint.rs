use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use url::Url;

use crate::error::YrError;

pub const DEFAULT_LOCATION_FORECAST_URL: &str =
    "http://api.yr.no/weatherapi/locationforecast/1.8/";
pub const DEFAULT_TEXT_FORECAST_URL: &str = "http://api.yr.no/weatherapi/textforecast/1.6/";

/// Operations offered by the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LocationForecast,
    TextForecast,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LocationForecast => "location_forecast",
            Operation::TextForecast => "text_forecast",
        }
    }

    pub const fn all() -> &'static [Operation] {
        &[Operation::LocationForecast, Operation::TextForecast]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Operation {
    type Error = YrError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "location_forecast" => Ok(Operation::LocationForecast),
            "text_forecast" => Ok(Operation::TextForecast),
            _ => Err(YrError::InvalidOperation(value.to_string())),
        }
    }
}

impl FromStr for Operation {
    type Err = YrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::try_from(s)
    }
}

/// Base URL for every [`Operation`].
///
/// One field per operation, so the set of keys can never drift from the set
/// of supported operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMap {
    pub location_forecast: Url,
    pub text_forecast: Url,
}

impl Default for EndpointMap {
    fn default() -> Self {
        Self {
            location_forecast: production_url(DEFAULT_LOCATION_FORECAST_URL),
            text_forecast: production_url(DEFAULT_TEXT_FORECAST_URL),
        }
    }
}

impl EndpointMap {
    pub fn new(location_forecast: Url, text_forecast: Url) -> Self {
        Self { location_forecast, text_forecast }
    }

    pub fn base(&self, operation: Operation) -> &Url {
        match operation {
            Operation::LocationForecast => &self.location_forecast,
            Operation::TextForecast => &self.text_forecast,
        }
    }

    pub fn set_base(&mut self, operation: Operation, url: Url) {
        match operation {
            Operation::LocationForecast => self.location_forecast = url,
            Operation::TextForecast => self.text_forecast = url,
        }
    }

    /// Full request URL for `operation` with `params` appended as a query string.
    pub fn url(&self, operation: Operation, params: &[(&str, &str)]) -> Url {
        let mut url = self.base(operation).clone();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    /// Same as [`EndpointMap::url`], looking the operation up by name.
    pub fn url_for(&self, operation: &str, params: &[(&str, &str)]) -> Result<Url, YrError> {
        let operation = Operation::try_from(operation)?;
        Ok(self.url(operation, params))
    }
}

fn production_url(raw: &'static str) -> Url {
    // Both constants are valid absolute URLs; covered by `defaults_are_production_endpoints`.
    Url::parse(raw).expect("production endpoint must be a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn operation_as_str_roundtrip() {
        for op in Operation::all() {
            let parsed = Operation::try_from(op.as_str()).expect("roundtrip should succeed");
            assert_eq!(*op, parsed);
        }
    }

    #[test]
    fn defaults_are_production_endpoints() {
        let map = EndpointMap::default();
        assert_eq!(map.location_forecast.as_str(), DEFAULT_LOCATION_FORECAST_URL);
        assert_eq!(map.text_forecast.as_str(), DEFAULT_TEXT_FORECAST_URL);
    }

    #[test]
    fn url_for_location_forecast_has_lon_and_lat() {
        let map = EndpointMap::default();
        let url = map
            .url_for("location_forecast", &[("lon", "5.32"), ("lat", "60.39")])
            .unwrap();

        assert!(url.as_str().starts_with(DEFAULT_LOCATION_FORECAST_URL));
        let q = query(&url);
        assert_eq!(q.len(), 2);
        assert_eq!(q["lon"], "5.32");
        assert_eq!(q["lat"], "60.39");
    }

    #[test]
    fn url_for_keeps_parameter_order() {
        let map = EndpointMap::default();
        let url = map
            .url_for("text_forecast", &[("forecast", "land"), ("language", "nb")])
            .unwrap();
        assert_eq!(url.query(), Some("forecast=land&language=nb"));
    }

    #[test]
    fn url_for_percent_encodes_values() {
        let map = EndpointMap::default();
        let url = map
            .url_for("text_forecast", &[("forecast", "sea & coast"), ("language", "nø")])
            .unwrap();

        assert_eq!(url.query(), Some("forecast=sea+%26+coast&language=n%C3%B8"));
        let q = query(&url);
        assert_eq!(q["forecast"], "sea & coast");
        assert_eq!(q["language"], "nø");
    }

    #[test]
    fn url_for_without_params_returns_base() {
        let map = EndpointMap::default();
        let url = map.url_for("text_forecast", &[]).unwrap();
        assert_eq!(url.as_str(), DEFAULT_TEXT_FORECAST_URL);
    }

    #[test]
    fn url_for_unknown_operation_errors() {
        let map = EndpointMap::default();
        let err = map.url_for("bogus_operation", &[]).unwrap_err();
        assert!(matches!(err, YrError::InvalidOperation(ref name) if name == "bogus_operation"));
        assert!(err.to_string().contains("Unknown operation"));
    }

    #[test]
    fn set_base_overrides_one_operation() {
        let mut map = EndpointMap::default();
        let custom = Url::parse("http://localhost:8080/lf/").unwrap();
        map.set_base(Operation::LocationForecast, custom.clone());

        assert_eq!(map.base(Operation::LocationForecast), &custom);
        assert_eq!(map.text_forecast.as_str(), DEFAULT_TEXT_FORECAST_URL);
    }
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

use crate::{
    client::DEFAULT_MAX_REDIRECTS,
    endpoint::{EndpointMap, Operation},
    model::{LocationArgs, TextForecastArgs},
};

/// Per-operation base URL overrides. Unset entries keep the production endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
    pub location_forecast: Option<Url>,
    pub text_forecast: Option<Url>,
}

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub max_redirects: usize,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { max_redirects: DEFAULT_MAX_REDIRECTS, timeout_secs: None, user_agent: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [endpoints]
/// location_forecast = "http://localhost:8080/locationforecast/"
///
/// [http]
/// max_redirects = 5
///
/// [default_location]
/// latitude = 60.39
/// longitude = 5.32
///
/// [text]
/// language = "en"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointOverrides,
    pub http: HttpConfig,
    pub default_location: Option<SavedLocation>,
    pub text: TextForecastArgs,
}

impl Config {
    /// Production endpoints with this config's overrides applied.
    pub fn endpoint_map(&self) -> EndpointMap {
        let mut map = EndpointMap::default();
        if let Some(url) = &self.endpoints.location_forecast {
            map.set_base(Operation::LocationForecast, url.clone());
        }
        if let Some(url) = &self.endpoints.text_forecast {
            map.set_base(Operation::TextForecast, url.clone());
        }
        map
    }

    pub fn set_default_location(&mut self, latitude: f64, longitude: f64) {
        self.default_location = Some(SavedLocation { latitude, longitude });
    }

    /// Location arguments for the saved default, or empty arguments if none is saved.
    pub fn default_location_args(&self) -> LocationArgs {
        self.default_location
            .map(|loc| LocationArgs::new(loc.latitude, loc.longitude))
            .unwrap_or_default()
    }

    /// Fills fields missing from `args` with this config's text defaults.
    pub fn text_args(&self, args: TextForecastArgs) -> TextForecastArgs {
        TextForecastArgs {
            forecast: args.forecast.or_else(|| self.text.forecast.clone()),
            language: args.language.or_else(|| self.text.language.clone()),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("no", "yr", "yr-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{DEFAULT_LOCATION_FORECAST_URL, DEFAULT_TEXT_FORECAST_URL};

    #[test]
    fn default_config_uses_production_endpoints() {
        let map = Config::default().endpoint_map();
        assert_eq!(map, EndpointMap::default());
        assert_eq!(map.text_forecast.as_str(), DEFAULT_TEXT_FORECAST_URL);
    }

    #[test]
    fn override_replaces_only_one_endpoint() {
        let mut cfg = Config::default();
        cfg.endpoints.text_forecast = Some(Url::parse("http://localhost:9000/tf/").unwrap());

        let map = cfg.endpoint_map();
        assert_eq!(map.text_forecast.as_str(), "http://localhost:9000/tf/");
        assert_eq!(map.location_forecast.as_str(), DEFAULT_LOCATION_FORECAST_URL);
    }

    #[test]
    fn missing_default_location_gives_empty_args() {
        let cfg = Config::default();
        assert!(cfg.default_location_args().validate().unwrap_err().is_validation());
    }

    #[test]
    fn saved_default_location_becomes_args() {
        let mut cfg = Config::default();
        cfg.set_default_location(60.39, 5.32);
        assert_eq!(cfg.default_location_args(), LocationArgs::new(60.39, 5.32));
    }

    #[test]
    fn text_args_prefer_explicit_then_config() {
        let mut cfg = Config::default();
        cfg.text.language = Some("en".into());
        cfg.text.forecast = Some("sea".into());

        let args = cfg.text_args(TextForecastArgs::default().forecast("land"));
        assert_eq!(args.forecast_or_default(), "land");
        assert_eq!(args.language_or_default(), "en");
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_default_location(60.39, 5.32);
        cfg.http.max_redirects = 3;
        cfg.http.timeout_secs = Some(15);
        cfg.endpoints.location_forecast = Some(Url::parse("http://localhost:8080/lf/").unwrap());
        cfg.text.language = Some("en".into());

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[http]\ntimeout_secs = 5\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.http.timeout_secs, Some(5));
        assert_eq!(cfg.http.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert!(cfg.default_location.is_none());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "http = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

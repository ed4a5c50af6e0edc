use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use tokio::runtime::Handle;
use yr_core::{Config, LocationArgs, TextForecastArgs, WeatherClient, WeatherClientBuilder};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "yr", version, about = "yr.no weather forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a default location and text forecast language.
    Configure,

    /// Show the forecast for a coordinate.
    Location {
        /// Latitude in decimal degrees. Falls back to the configured default.
        #[arg(allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Longitude in decimal degrees. Falls back to the configured default.
        #[arg(allow_negative_numbers = true)]
        longitude: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a text forecast.
    Text {
        /// Forecast type, e.g. "land" or "sea".
        #[arg(long)]
        forecast: Option<String>,

        /// Language code, e.g. "nb" or "en".
        #[arg(long)]
        language: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the request URL for an operation.
    Url {
        /// "location_forecast" or "text_forecast".
        operation: String,

        /// Query parameters as key=value.
        params: Vec<String>,
    },
}

#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Print the document as JSON.
    #[arg(long)]
    pub json: bool,

    /// Maximum depth of the printed tree.
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}

impl Cli {
    pub fn run(self, runtime: &Handle) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Location { latitude, longitude, output } => {
                let args = location_args(&config, latitude, longitude);
                let client = client(&config, runtime)?;
                let doc = client.location_forecast_blocking(args)?;
                render::print(&doc, output.json, output.depth)
            }
            Command::Text { forecast, language, output } => {
                let args = config.text_args(TextForecastArgs { forecast, language });

                let client = client(&config, runtime)?;
                let doc = client.text_forecast_blocking(args)?;
                render::print(&doc, output.json, output.depth)
            }
            Command::Url { operation, params } => {
                let pairs = query_params(&params)?;
                let url = config.endpoint_map().url_for(&operation, &pairs)?;
                println!("{url}");
                Ok(())
            }
        }
    }
}

/// Coordinates from the command line; the saved default only when none were given.
fn location_args(config: &Config, latitude: Option<f64>, longitude: Option<f64>) -> LocationArgs {
    if latitude.is_some() || longitude.is_some() {
        LocationArgs { latitude, longitude }
    } else {
        config.default_location_args()
    }
}

fn query_params(params: &[String]) -> anyhow::Result<Vec<(&str, &str)>> {
    params
        .iter()
        .map(|p| {
            p.split_once('=')
                .ok_or_else(|| anyhow!("Invalid parameter '{p}', expected key=value"))
        })
        .collect()
}

fn client(config: &Config, runtime: &Handle) -> anyhow::Result<WeatherClient> {
    WeatherClientBuilder::from_config(config)
        .runtime(runtime.clone())
        .build()
        .context("Failed to create weather client")
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let saved = config.default_location;

    let mut latitude = CustomType::<f64>::new("Default latitude:")
        .with_error_message("Please enter a number, e.g. 60.39");
    if let Some(loc) = saved {
        latitude = latitude.with_default(loc.latitude);
    }
    let latitude = latitude.prompt()?;

    let mut longitude = CustomType::<f64>::new("Default longitude:")
        .with_error_message("Please enter a number, e.g. 5.32");
    if let Some(loc) = saved {
        longitude = longitude.with_default(loc.longitude);
    }
    let longitude = longitude.prompt()?;

    let language = Text::new("Text forecast language:")
        .with_default(config.text.language_or_default())
        .prompt()?;

    config.set_default_location(latitude, longitude);
    config.text.language = Some(language);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_split_on_first_equals() {
        let params = vec!["lon=5.32".to_string(), "q=a=b".to_string(), "empty=".to_string()];
        let pairs = query_params(&params).unwrap();
        assert_eq!(pairs, vec![("lon", "5.32"), ("q", "a=b"), ("empty", "")]);
    }

    #[test]
    fn query_param_without_equals_errors() {
        let params = vec!["lat=60.1".to_string(), "foo".to_string()];
        let err = query_params(&params).unwrap_err();
        assert!(err.to_string().contains("Invalid parameter 'foo'"));
    }

    #[test]
    fn location_falls_back_to_saved_default() {
        let mut config = Config::default();
        config.set_default_location(60.39, 5.32);

        assert_eq!(location_args(&config, None, None), LocationArgs::new(60.39, 5.32));
    }

    #[test]
    fn explicit_coordinates_replace_saved_default() {
        let mut config = Config::default();
        config.set_default_location(60.39, 5.32);

        assert_eq!(location_args(&config, Some(-33.9), Some(18.4)), LocationArgs::new(-33.9, 18.4));

        // A lone latitude is not merged with the saved longitude.
        let partial = location_args(&config, Some(59.9), None);
        assert!(partial.validate().unwrap_err().is_validation());
    }

    #[test]
    fn no_default_and_no_coordinates_is_a_validation_error() {
        let args = location_args(&Config::default(), None, None);
        assert!(args.validate().unwrap_err().is_validation());
    }

    #[test]
    fn negative_coordinates_parse_as_positionals() {
        let cli = Cli::try_parse_from(["yr", "location", "-33.9", "18.4", "--json"]).unwrap();
        match cli.command {
            Command::Location { latitude, longitude, output } => {
                assert_eq!(latitude, Some(-33.9));
                assert_eq!(longitude, Some(18.4));
                assert!(output.json);
                assert_eq!(output.depth, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn url_command_collects_params() {
        let cli = Cli::try_parse_from(["yr", "url", "text_forecast", "language=en"]).unwrap();
        match cli.command {
            Command::Url { operation, params } => {
                assert_eq!(operation, "text_forecast");
                assert_eq!(params, vec!["language=en".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! Core library for the `yr` weather client.
//!
//! This crate defines:
//! - The endpoint map for the yr.no location and text forecast services
//! - A client with async, callback and blocking calling conventions
//! - A navigable document tree for the XML responses
//! - Configuration handling
//!
//! It is used by `yr-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! use yr_core::{TextForecastArgs, WeatherClient};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let client = WeatherClient::builder().runtime(runtime.handle().clone()).build()?;
//!
//! let doc = client.location_forecast_blocking([60.39, 5.32])?;
//! if let Some(time) = doc.child("time") {
//!     for temp in time.descendants_named("temperature") {
//!         println!("{:?}", temp.attribute("value"));
//!     }
//! }
//!
//! client.text_forecast_with(TextForecastArgs::default().language("en"), |result| {
//!     match result {
//!         Ok(doc) => println!("{}", doc.name()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod model;

pub use client::{WeatherClient, WeatherClientBuilder};
pub use config::Config;
pub use document::{Element, ForecastDocument};
pub use endpoint::{EndpointMap, Operation};
pub use error::YrError;
pub use fetch::Fetch;
pub use model::{LocationArgs, TextForecastArgs};

//! Core library for the `weatherpanel` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the position capability it is fed from
//! - The local clock simulator
//! - `WeatherPanel`, which wires them together
//!
//! It is used by `weatherpanel-cli`, but can also be reused by other binaries or services.

pub mod clock;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod panel;
pub mod provider;

pub use clock::{ClockSimulator, SystemClock, TimeSource, format_local_time};
pub use config::{Config, LocationConfig};
pub use error::{LocationError, PanelError};
pub use location::{ConfiguredPosition, PositionProvider};
pub use model::{Coordinates, LocationQuery, WeatherResult};
pub use panel::WeatherPanel;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};

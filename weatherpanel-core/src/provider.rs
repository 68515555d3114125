use crate::{Config, LocationQuery, WeatherResult, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Resolves a query to current conditions. The response is accepted or
/// rejected as a whole; implementations never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> anyhow::Result<WeatherResult>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn current(&self, query: &LocationQuery) -> anyhow::Result<WeatherResult> {
        (**self).current(query).await
    }
}

/// Construct the OpenWeather provider from config, honoring the env key override.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = OpenWeatherProvider::new(api_key, config.base_url())?;
    Ok(Box::new(provider))
}

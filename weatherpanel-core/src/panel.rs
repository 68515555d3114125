//! The weather panel: location lookup, weather fetch and local clock.
//!
//! Requests are serialized by `&mut self`; each call finishes (success or
//! failure) before the next one starts, so the last completed request decides
//! what is shown.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    clock::{ClockSimulator, TimeSource},
    error::PanelError,
    location::PositionProvider,
    model::{LocationQuery, WeatherResult},
    provider::WeatherProvider,
};

#[derive(Debug)]
pub struct WeatherPanel<W, P> {
    provider: W,
    position: P,
    clock: ClockSimulator,
    result: Option<WeatherResult>,
    error: Option<PanelError>,
    mounted: bool,
    requests: u64,
}

impl<W, P> WeatherPanel<W, P>
where
    W: WeatherProvider,
    P: PositionProvider,
{
    pub fn new(provider: W, position: P) -> Self {
        Self::with_clock(provider, position, ClockSimulator::new())
    }

    pub fn with_time_source(provider: W, position: P, source: Arc<dyn TimeSource>) -> Self {
        Self::with_clock(provider, position, ClockSimulator::with_source(source))
    }

    fn with_clock(provider: W, position: P, clock: ClockSimulator) -> Self {
        Self {
            provider,
            position,
            clock,
            result: None,
            error: None,
            mounted: false,
            requests: 0,
        }
    }

    /// Automatic lookup from the device position. Only the first call does anything.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match self.position.current_position().await {
            Ok(coords) => {
                self.submit(LocationQuery::Coordinates(coords)).await;
            }
            Err(err) => {
                tracing::info!(error = %err, "position lookup failed, skipping weather fetch");
                self.error = Some(err.into());
                self.result = None;
            }
        }
    }

    /// Looks up `text` as a city name. Empty text is sent as-is.
    pub async fn search(&mut self, text: &str) {
        self.submit(LocationQuery::city(text)).await;
    }

    /// Fetches weather for `query` and updates the panel with the outcome.
    pub async fn submit(&mut self, query: LocationQuery) {
        self.requests += 1;
        let request = self.requests;
        tracing::debug!(request, %query, "weather lookup");

        match self.provider.current(&query).await {
            Ok(result) => {
                self.error = None;
                self.clock.start(result.utc_offset_secs);
                self.result = Some(result);
            }
            Err(err) => {
                tracing::warn!(request, %query, error = ?err, "weather lookup failed");
                self.error = Some(PanelError::for_failed_query(&query));
                self.result = None;
            }
        }
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<PanelError> {
        self.error
    }

    pub fn clock(&self) -> &ClockSimulator {
        &self.clock
    }

    /// Receiver that observes every clock tick.
    pub fn subscribe_clock(&self) -> watch::Receiver<String> {
        self.clock.subscribe()
    }

    pub fn local_time(&self) -> String {
        self.clock.current()
    }
}

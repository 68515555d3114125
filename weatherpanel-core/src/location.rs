use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::LocationError, model::Coordinates};

/// Source of the device's current position (single-shot).
#[async_trait]
pub trait PositionProvider: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from configuration or command-line flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfiguredPosition {
    outcome: Result<Coordinates, LocationError>,
}

impl ConfiguredPosition {
    /// `None` means this platform has no position to offer.
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { outcome: coords.ok_or(LocationError::Unsupported) }
    }

    pub fn denied() -> Self {
        Self { outcome: Err(LocationError::Denied) }
    }
}

#[async_trait]
impl PositionProvider for ConfiguredPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_position_outcomes() {
        let here = Coordinates::new(51.5, -0.12);

        assert_eq!(ConfiguredPosition::new(Some(here)).current_position().await, Ok(here));
        assert_eq!(
            ConfiguredPosition::new(None).current_position().await,
            Err(LocationError::Unsupported)
        );
        assert_eq!(
            ConfiguredPosition::denied().current_position().await,
            Err(LocationError::Denied)
        );
    }
}

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// What the user (or the device) asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City { text: String },
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn city(text: impl Into<String>) -> Self {
        LocationQuery::City { text: text.into() }
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LocationQuery::Coordinates(Coordinates::new(lat, lon))
    }

    pub fn is_city(&self) -> bool {
        matches!(self, LocationQuery::City { .. })
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City { text } => write!(f, "city '{text}'"),
            LocationQuery::Coordinates(c) => write!(f, "coordinates ({}, {})", c.lat, c.lon),
        }
    }
}

/// Current conditions for one place, normalized from the provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub place: String,
    pub country: String,
    pub condition: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// Seconds east of UTC.
    pub utc_offset_secs: i32,
}

use anyhow::{Context, Result, anyhow};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use weatherpanel_core::{Config, Coordinates, config::DEFAULT_BASE_URL};

/// Interactive setup; writes the result to the config file.
pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key (empty keeps the current one):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current_base = config.base_url().to_string();
    let base_url = Text::new("API base URL:")
        .with_default(&current_base)
        .prompt()
        .context("Failed to read base URL")?;
    config.base_url = (base_url.trim() != DEFAULT_BASE_URL).then(|| base_url.trim().to_string());

    config.location.enabled = Confirm::new("Look up weather for your position on startup?")
        .with_default(config.location.enabled)
        .prompt()
        .context("Failed to read position preference")?;

    if config.location.enabled {
        let current = config
            .location
            .coordinates()
            .map(|c| format!("{},{}", c.lat, c.lon))
            .unwrap_or_default();
        let input = Text::new("Your position as `lat,lon` (empty for none):")
            .with_default(&current)
            .prompt()
            .context("Failed to read position")?;

        let coords = parse_coordinates(&input)?;
        config.location.lat = coords.map(|c| c.lat);
        config.location.lon = coords.map(|c| c.lon);
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Parses `lat,lon`; empty input means no position.
pub fn parse_coordinates(input: &str) -> Result<Option<Coordinates>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected `lat,lon`, got '{input}'"))?;

    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude '{}'", lon.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(anyhow!("Latitude {lat} is outside -90..90"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(anyhow!("Longitude {lon} is outside -180..180"));
    }

    Ok(Some(Coordinates::new(lat, lon)))
}

use weatherpanel_core::{PanelError, WeatherResult};

pub const PROMPT: &str = "Enter city: ";

/// Rounds half up, so -0.5 becomes 0 and 0.5 becomes 1.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// The panel as plain text: the error line, or the weather block.
pub fn panel_text(result: Option<&WeatherResult>, error: Option<PanelError>, local_time: &str) -> String {
    let mut lines = Vec::new();

    if let Some(err) = error {
        lines.push(err.to_string());
    }

    if let Some(w) = result {
        lines.push(format!("{}, {}", w.place, w.country));
        if !local_time.is_empty() {
            lines.push(local_time.to_string());
        }
        lines.push(w.condition.clone());
        lines.push(format!("{}°c", round_half_up(w.temperature_c)));
        lines.push(format!(
            "Low: {}°c / High: {}°c",
            round_half_up(w.temp_min_c),
            round_half_up(w.temp_max_c)
        ));
        lines.push(format!("Humidity: {}%   Wind: {} m/s", w.humidity_pct, w.wind_speed_mps));
    }

    lines.join("\n")
}

//! Plain-text rendering of the form and its results.

use std::fmt;

use crate::{model::Recommendation, view::FormView};

pub const IDLE_LABEL: &str = "Get recommendations";
pub const IN_FLIGHT_LABEL: &str = "Searching...";

const ICON_URL_PREFIX: &str = "http://openweathermap.org/img/wn/";
const ICON_URL_SUFFIX: &str = "@2x.png";

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_PREFIX}{icon}{ICON_URL_SUFFIX}")
}

/// One decimal place, e.g. `21.3°C`. Exact halves round away from zero.
pub fn format_temperature(celsius: f64) -> String {
    format!("{:.1}°C", round_tenths(celsius))
}

// `{:.1}` already rounds the exact binary value correctly; it only differs on
// exact ties, where it picks the even digit. A tenths tie is exactly
// representable only as a multiple of 0.25, so that is the case to catch.
fn round_tenths(value: f64) -> f64 {
    let quarters = value * 4.0;
    let is_tie = quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if is_tie && quarters.abs() < 1e15 {
        (value * 10.0).round() / 10.0
    } else {
        value
    }
}

/// Each line of the recommendation text is its own paragraph, in order.
pub fn paragraphs(recommendations: &str) -> Vec<&str> {
    recommendations.split('\n').collect()
}

pub fn submit_label(view: &FormView) -> &'static str {
    if view.is_loading() { IN_FLIGHT_LABEL } else { IDLE_LABEL }
}

/// The submit button line, marked disabled while a request is in flight.
pub struct SubmitControl<'a>(pub &'a FormView);

impl fmt::Display for SubmitControl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.submit_enabled() {
            write!(f, "[ {} ]", submit_label(self.0))
        } else {
            write!(f, "[ {} ] (disabled)", submit_label(self.0))
        }
    }
}

/// Displays the whole view: inputs, submit control, error line and results.
pub struct Screen<'a>(pub &'a FormView);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(f, "City: {}", view.city())?;
        match view.date() {
            Some(date) => writeln!(f, "Date: {}", date.format("%Y-%m-%d"))?,
            None => writeln!(f, "Date: -")?,
        }

        writeln!(f, "{}", SubmitControl(view))?;

        if let Some(error) = view.error() {
            writeln!(f)?;
            writeln!(f, "Error: {error}")?;
        }

        if let Some(data) = view.data() {
            writeln!(f)?;
            write!(f, "{}", Results(data))?;
        }

        Ok(())
    }
}

/// The two result panels: weather card, then recommendations.
pub struct Results<'a>(pub &'a Recommendation);

impl fmt::Display for Results<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weather = &self.0.weather;

        writeln!(f, "== Weather for {} ==", weather.city)?;
        writeln!(f, "Icon: {}", icon_url(&weather.icon))?;
        writeln!(f, "{}", format_temperature(weather.temperature))?;
        writeln!(f, "{}", weather.description)?;
        if let Some(feels_like) = weather.feels_like {
            writeln!(f, "Feels like: {}", format_temperature(feels_like))?;
        }
        if let Some(humidity) = weather.humidity {
            writeln!(f, "Humidity: {humidity}%")?;
        }
        if let Some(wind) = weather.wind_speed {
            writeln!(f, "Wind: {wind} m/s")?;
        }

        writeln!(f)?;
        writeln!(f, "== AI Recommendations ==")?;
        for paragraph in paragraphs(&self.0.recommendations) {
            writeln!(f, "{paragraph}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// Body of `POST /api/weather-recommendation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationRequest {
    pub city: String,

    /// Sent as `"YYYY-MM-DD"`, or `""` when no date was picked.
    #[serde(serialize_with = "date_or_empty")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    pub icon: String,
    pub description: String,
    pub temperature: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub weather: WeatherSummary,
    /// Newline-delimited free text.
    pub recommendations: String,
}

/// Error body returned by the backend on a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn date_or_empty<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.collect_str(&d.format("%Y-%m-%d")),
        None => s.serialize_str(""),
    }
}

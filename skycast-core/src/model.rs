use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder shown when the provider omits a condition description.
const UNKNOWN_CONDITION: &str = "Unknown";

/// Placeholder shown when the provider omits an astro time.
const UNKNOWN_TIME: &str = "--:--";

/// A candidate location returned by the search endpoint.
///
/// Ephemeral: held only in the candidate list until the user picks one or the
/// list is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// "Omsk, Russia" style label; falls back to the bare name when the
    /// country is absent.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Condition {
    #[serde(default)]
    pub text: Option<String>,
}

impl Condition {
    pub fn display(&self) -> &str {
        self.text.as_deref().unwrap_or(UNKNOWN_CONDITION)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CurrentConditions {
    #[serde(default)]
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub wind_kph: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub condition: Condition,
}

impl CurrentConditions {
    pub fn temp_c(&self) -> f64 {
        self.temp_c.unwrap_or_default()
    }

    pub fn wind_kph(&self) -> f64 {
        self.wind_kph.unwrap_or_default()
    }

    pub fn humidity(&self) -> u8 {
        self.humidity.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: Option<String>,
}

impl Astro {
    pub fn sunrise(&self) -> &str {
        self.sunrise.as_deref().unwrap_or(UNKNOWN_TIME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DaySummary {
    #[serde(default)]
    pub avgtemp_c: Option<f64>,
    #[serde(default)]
    pub condition: Condition,
}

impl DaySummary {
    pub fn avgtemp_c(&self) -> f64 {
        self.avgtemp_c.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayForecast {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub astro: Astro,
    #[serde(default)]
    pub day: DaySummary,
}

impl DayForecast {
    /// Weekday name ("Monday") parsed from the forecast date, if the date is
    /// well-formed.
    pub fn weekday(&self) -> Option<String> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%A").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<DayForecast>,
}

/// The full current + forecast payload for one resolved city.
///
/// Replaced wholesale on each successful fetch; never merged or patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: Forecast,
}

impl WeatherSnapshot {
    /// Sunrise of the first forecast day, placeholder when absent.
    pub fn sunrise_today(&self) -> &str {
        self.forecast
            .forecastday
            .first()
            .map(|d| d.astro.sunrise())
            .unwrap_or(UNKNOWN_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_label_includes_country() {
        let loc = Location {
            name: "Omsk".into(),
            country: "Russia".into(),
            ..Location::default()
        };
        assert_eq!(loc.label(), "Omsk, Russia");
    }

    #[test]
    fn location_label_without_country() {
        assert_eq!(Location::named("Astana").label(), "Astana");
    }

    #[test]
    fn snapshot_parses_full_payload() {
        let json = r#"{
            "location": { "name": "Almaty", "region": "Almaty", "country": "Kazakhstan", "id": 7 },
            "current": {
                "temp_c": 21.5,
                "wind_kph": 13.0,
                "humidity": 40,
                "condition": { "text": "Sunny" }
            },
            "forecast": {
                "forecastday": [
                    {
                        "date": "2024-05-06",
                        "astro": { "sunrise": "05:31 AM" },
                        "day": { "avgtemp_c": 18.2, "condition": { "text": "Partly cloudy" } }
                    }
                ]
            }
        }"#;

        let snap: WeatherSnapshot = serde_json::from_str(json).expect("valid payload");
        assert_eq!(snap.location.label(), "Almaty, Kazakhstan");
        assert_eq!(snap.current.temp_c(), 21.5);
        assert_eq!(snap.current.condition.display(), "Sunny");
        assert_eq!(snap.sunrise_today(), "05:31 AM");
        assert_eq!(snap.forecast.forecastday[0].day.avgtemp_c(), 18.2);
    }

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let snap: WeatherSnapshot = serde_json::from_str("{}").expect("empty object is valid");
        assert_eq!(snap.current.temp_c(), 0.0);
        assert_eq!(snap.current.humidity(), 0);
        assert_eq!(snap.current.condition.display(), "Unknown");
        assert_eq!(snap.sunrise_today(), "--:--");
        assert!(snap.forecast.forecastday.is_empty());
    }

    #[test]
    fn day_forecast_weekday() {
        let day = DayForecast { date: "2024-05-06".into(), ..DayForecast::default() };
        assert_eq!(day.weekday().as_deref(), Some("Monday"));

        let bad = DayForecast { date: "yesterday".into(), ..DayForecast::default() };
        assert_eq!(bad.weekday(), None);
    }
}

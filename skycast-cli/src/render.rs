use std::fmt::Write;

use skycast_core::WeatherSnapshot;

/// Render a snapshot as the terminal equivalent of the home screen: location
/// header, current conditions, then one line per forecast day.
pub fn snapshot(snapshot: Option<&WeatherSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "No forecast available.\n".to_string();
    };

    let mut out = String::new();
    let current = &snapshot.current;

    let _ = writeln!(out, "{}", snapshot.location.label());
    let _ = writeln!(out, "  {}, {:.1}\u{b0}C", current.condition.display(), current.temp_c());
    let _ = writeln!(
        out,
        "  wind {:.1} km/h   humidity {}%   sunrise {}",
        current.wind_kph(),
        current.humidity(),
        snapshot.sunrise_today(),
    );

    if !snapshot.forecast.forecastday.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Daily forecast:");
        for day in &snapshot.forecast.forecastday {
            let weekday = day.weekday().unwrap_or_else(|| day.date.clone());
            let _ = writeln!(
                out,
                "  {:<10} {:>6.1}\u{b0}C  {}",
                weekday,
                day.day.avgtemp_c(),
                day.day.condition.display(),
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::model::{
        Astro, Condition, CurrentConditions, DayForecast, DaySummary, Forecast, Location,
    };

    fn sample() -> WeatherSnapshot {
        WeatherSnapshot {
            location: Location {
                name: "Omsk".into(),
                country: "Russia".into(),
                ..Location::default()
            },
            current: CurrentConditions {
                temp_c: Some(21.5),
                wind_kph: Some(13.0),
                humidity: Some(40),
                condition: Condition { text: Some("Sunny".into()) },
            },
            forecast: Forecast {
                forecastday: vec![DayForecast {
                    date: "2024-05-06".into(),
                    astro: Astro { sunrise: Some("05:31 AM".into()) },
                    day: DaySummary {
                        avgtemp_c: Some(18.2),
                        condition: Condition { text: Some("Partly cloudy".into()) },
                    },
                }],
            },
        }
    }

    #[test]
    fn renders_header_current_and_forecast() {
        let out = snapshot(Some(&sample()));

        assert!(out.contains("Omsk, Russia"));
        assert!(out.contains("Sunny, 21.5"));
        assert!(out.contains("humidity 40%"));
        assert!(out.contains("sunrise 05:31 AM"));
        assert!(out.contains("Monday"));
        assert!(out.contains("Partly cloudy"));
    }

    #[test]
    fn renders_placeholder_without_a_snapshot() {
        assert_eq!(snapshot(None), "No forecast available.\n");
    }

    #[test]
    fn empty_payload_renders_placeholders_not_panics() {
        let out = snapshot(Some(&WeatherSnapshot::default()));

        assert!(out.contains("Unknown, 0.0"));
        assert!(out.contains("sunrise --:--"));
        assert!(!out.contains("Daily forecast"));
    }
}

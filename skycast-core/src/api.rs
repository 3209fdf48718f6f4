use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::WeatherError,
    model::{Location, WeatherSnapshot},
};

const SEARCH_URL: &str = "http://api.weatherapi.com/v1/search.json";
const FORECAST_URL: &str = "http://api.weatherapi.com/v1/forecast.json";

/// The two read-only endpoints the workflow depends on.
///
/// The engine holds this behind a trait object so tests can substitute a
/// scripted implementation for the real HTTP client.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Resolve a free-text city fragment to candidate locations.
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError>;

    /// Fetch current conditions plus a `days`-day forecast for a city.
    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherSnapshot, WeatherError>;
}

/// WeatherAPI.com client.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: Client::new() }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        tracing::debug!(query, "searching locations");
        self.get_json(SEARCH_URL, &[("key", self.api_key.as_str()), ("q", query)])
            .await
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherSnapshot, WeatherError> {
        tracing::debug!(city, days, "fetching forecast");
        self.get_json(
            FORECAST_URL,
            &[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", &days.to_string()),
            ],
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let kept: String = body.chars().take(MAX).collect();
        format!("{kept}...")
    } else {
        body.to_string()
    }
}

//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration handling (API key)
//! - The WeatherAPI.com client behind the [`WeatherApi`] trait
//! - The search/forecast workflow: debounced city search, candidate
//!   selection, tokened forecast fetches and last-city persistence
//!
//! It is used by `skycast-cli`, but can also be reused by other front-ends.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod store;
pub mod workflow;

pub use api::{WeatherApi, WeatherApiClient};
pub use config::Config;
pub use debounce::{Debouncer, DEBOUNCE_WINDOW};
pub use error::WeatherError;
pub use model::{DayForecast, Location, WeatherSnapshot};
pub use store::LastCityStore;
pub use workflow::{
    Effect, WeatherApp, Workflow, WorkflowEvent, WorkflowState, FALLBACK_CITY, FORECAST_DAYS,
};

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use skycast_core::{
    Config, LastCityStore, WeatherApi, WeatherApiClient, WeatherApp, WorkflowEvent,
};

use crate::render;

/// Cities the app has seen before, offered on the history screen.
const HISTORY_CITIES: [&str; 4] = ["Kokshetau", "Astana", "Omsk", "Almaty"];

/// Minimum characters before a search query is worth sending.
const MIN_QUERY_LEN: usize = 3;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for the last viewed city (or a given one).
    Show {
        /// City name; when absent the persisted city or the default is used.
        city: Option<String>,
    },

    /// Search for a city and show its forecast.
    Search {
        /// Query text; prompted for interactively when absent.
        query: Option<String>,
    },

    /// Pick a previously searched city.
    History,

    /// Store the WeatherAPI.com key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Command::Configure = self.command {
            return configure();
        }

        let config = Config::load()?;
        let api: Arc<dyn WeatherApi> = Arc::new(WeatherApiClient::new(config.api_key()?.to_string()));
        let store = LastCityStore::open_default()?;
        let mut app = WeatherApp::new(api, store);

        tracing::debug!(command = ?self.command, "running");

        match self.command {
            Command::Show { city } => show(&mut app, city).await,
            Command::Search { query } => search(&mut app, query).await,
            Command::History => history(&mut app).await,
            Command::Configure => unreachable!("handled above"),
        }
    }
}

/// Startup flow: with a city argument this is the cross-screen handoff,
/// without one it is the persisted-city/fallback flow.
async fn show(app: &mut WeatherApp, city: Option<String>) -> Result<()> {
    match city {
        Some(city) => app.dispatch(WorkflowEvent::CityHandedOff(city)).await,
        None => app.dispatch(WorkflowEvent::Started).await,
    }
    app.run_until_idle().await;

    print!("{}", render::snapshot(app.snapshot()));
    Ok(())
}

async fn search(app: &mut WeatherApp, query: Option<String>) -> Result<()> {
    let query = match query {
        Some(query) => query,
        None => inquire::Text::new("City:").prompt()?,
    };

    if query.trim().chars().count() < MIN_QUERY_LEN {
        println!("Type at least {MIN_QUERY_LEN} characters.");
        return Ok(());
    }

    app.dispatch(WorkflowEvent::SearchToggled).await;
    app.dispatch(WorkflowEvent::QueryTyped(query.clone())).await;
    app.tick().await; // debounce window elapses
    app.tick().await; // candidates arrive

    let candidates = app.candidates().to_vec();
    if candidates.is_empty() {
        println!("No matches for \"{query}\".");
        return Ok(());
    }

    let labels: Vec<String> = candidates.iter().map(|loc| loc.label()).collect();
    let picked = inquire::Select::new("Pick a location:", labels).raw_prompt()?.index;

    app.dispatch(WorkflowEvent::CandidateSelected(candidates[picked].clone())).await;
    app.run_until_idle().await;

    print!("{}", render::snapshot(app.snapshot()));
    Ok(())
}

/// The history screen: a fixed list of previously searched cities; picking
/// one hands the name to the workflow exactly like a manual selection.
async fn history(app: &mut WeatherApp) -> Result<()> {
    let city = inquire::Select::new("Search history:", HISTORY_CITIES.to_vec()).prompt()?;

    app.dispatch(WorkflowEvent::CityHandedOff(city.to_string())).await;
    app.run_until_idle().await;

    print!("{}", render::snapshot(app.snapshot()));
    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()?;
    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

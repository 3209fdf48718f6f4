/// Errors produced while talking to the weather API or the on-disk store.
///
/// Nothing here is fatal to the workflow: search failures degrade to an empty
/// candidate list, forecast failures clear the loading state and keep the
/// previous snapshot, store failures fall back to the default city.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Parse(err.to_string())
    }
}

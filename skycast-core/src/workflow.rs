use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    api::WeatherApi,
    debounce::{Debouncer, DEBOUNCE_WINDOW},
    error::WeatherError,
    model::{Location, WeatherSnapshot},
    store::LastCityStore,
};

/// City fetched at startup when nothing has been persisted yet.
pub const FALLBACK_CITY: &str = "Kokshetau";

/// Forecast horizon requested on every fetch.
pub const FORECAST_DAYS: u8 = 7;

/// Queries at or below this many trimmed characters never reach the API.
const MIN_QUERY_CHARS: usize = 2;

/// The single discriminated workflow state.
///
/// `Loading` and `SearchOpen` carry the snapshot to return to, so impossible
/// flag combinations (loading with the panel open, stale candidates next to a
/// spinner) cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Loading { previous: Option<WeatherSnapshot> },
    Idle { snapshot: Option<WeatherSnapshot> },
    SearchOpen { previous: Option<WeatherSnapshot>, candidates: Vec<Location> },
}

/// Everything that can happen to the workflow, including completions of its
/// own effects.
#[derive(Debug)]
pub enum WorkflowEvent {
    /// Application start.
    Started,
    /// The persisted city was read (or found absent).
    StoredCityLoaded(Option<String>),
    /// Search panel opened or closed.
    SearchToggled,
    /// A keystroke in the search field.
    QueryTyped(String),
    /// The debounce window elapsed with this trailing value.
    QueryElapsed(String),
    /// A location search finished; failures arrive as an empty list.
    CandidatesLoaded(Vec<Location>),
    /// The user picked a candidate from the panel.
    CandidateSelected(Location),
    /// A city name handed over from another screen, equivalent to a selection.
    CityHandedOff(String),
    /// A forecast fetch resolved, success or failure.
    FetchResolved {
        token: u64,
        outcome: Result<WeatherSnapshot, WeatherError>,
    },
}

/// Side effects requested by the reducer, executed by [`WeatherApp`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the persisted city.
    LoadStoredCity,
    /// Feed the query through the debouncer.
    Debounce(String),
    /// Call the location search endpoint.
    Search(String),
    /// Call the forecast endpoint; the token identifies this fetch generation.
    Fetch { token: u64, city: String },
    /// Persist the selected city.
    Persist(String),
}

#[derive(Debug, Clone)]
struct PendingFetch {
    token: u64,
    city: String,
    persist: bool,
}

/// Pure state machine: events in, transition, effects out.
///
/// Fetches carry a monotonically increasing token; a resolution is applied
/// only when its token equals the latest issued one, so a superseded fetch
/// can never overwrite a newer selection (strict latest-wins).
#[derive(Debug)]
pub struct Workflow {
    state: WorkflowState,
    issued: u64,
    pending: Option<PendingFetch>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle { snapshot: None },
            issued: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, WorkflowState::Loading { .. })
    }

    /// The snapshot currently on display, if any.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.state {
            WorkflowState::Loading { previous } => previous.as_ref(),
            WorkflowState::Idle { snapshot } => snapshot.as_ref(),
            WorkflowState::SearchOpen { previous, .. } => previous.as_ref(),
        }
    }

    /// Candidates on display; empty unless the search panel is open.
    pub fn candidates(&self) -> &[Location] {
        match &self.state {
            WorkflowState::SearchOpen { candidates, .. } => candidates,
            _ => &[],
        }
    }

    pub fn apply(&mut self, event: WorkflowEvent) -> Vec<Effect> {
        match event {
            WorkflowEvent::Started => {
                self.state = WorkflowState::Loading { previous: self.take_snapshot() };
                vec![Effect::LoadStoredCity]
            }

            WorkflowEvent::StoredCityLoaded(stored) => {
                let city = stored.unwrap_or_else(|| FALLBACK_CITY.to_string());
                // Startup fetch: render-only, the stored value is not rewritten.
                vec![self.issue_fetch(city, false)]
            }

            WorkflowEvent::SearchToggled => {
                match std::mem::replace(&mut self.state, WorkflowState::Idle { snapshot: None }) {
                    WorkflowState::Idle { snapshot } => {
                        self.state = WorkflowState::SearchOpen {
                            previous: snapshot,
                            candidates: Vec::new(),
                        };
                    }
                    WorkflowState::SearchOpen { previous, .. } => {
                        // Closing without a selection discards the candidates.
                        self.state = WorkflowState::Idle { snapshot: previous };
                    }
                    loading @ WorkflowState::Loading { .. } => {
                        // The panel is unreachable while the spinner is up.
                        self.state = loading;
                    }
                }
                Vec::new()
            }

            WorkflowEvent::QueryTyped(query) => {
                if matches!(self.state, WorkflowState::SearchOpen { .. }) {
                    vec![Effect::Debounce(query)]
                } else {
                    Vec::new()
                }
            }

            WorkflowEvent::QueryElapsed(query) => {
                let long_enough = query.trim().chars().count() > MIN_QUERY_CHARS;
                if long_enough && matches!(self.state, WorkflowState::SearchOpen { .. }) {
                    vec![Effect::Search(query)]
                } else {
                    // Too short: no call, candidates stay as they are.
                    Vec::new()
                }
            }

            WorkflowEvent::CandidatesLoaded(list) => {
                if let WorkflowState::SearchOpen { candidates, .. } = &mut self.state {
                    // Replaced in full, never appended.
                    *candidates = list;
                } else {
                    tracing::debug!("dropping candidates, search panel closed");
                }
                Vec::new()
            }

            WorkflowEvent::CandidateSelected(location) => self.begin_selection(location.name),

            WorkflowEvent::CityHandedOff(city) => self.begin_selection(city),

            WorkflowEvent::FetchResolved { token, outcome } => self.resolve_fetch(token, outcome),
        }
    }

    /// A selection (panel pick or cross-screen handoff): close the panel,
    /// clear the candidates and start a tokened, persisting fetch.
    fn begin_selection(&mut self, city: String) -> Vec<Effect> {
        self.state = WorkflowState::Loading { previous: self.take_snapshot() };
        vec![self.issue_fetch(city, true)]
    }

    fn issue_fetch(&mut self, city: String, persist: bool) -> Effect {
        self.issued += 1;
        self.pending = Some(PendingFetch { token: self.issued, city: city.clone(), persist });
        Effect::Fetch { token: self.issued, city }
    }

    fn resolve_fetch(
        &mut self,
        token: u64,
        outcome: Result<WeatherSnapshot, WeatherError>,
    ) -> Vec<Effect> {
        if token != self.issued {
            tracing::debug!(token, latest = self.issued, "discarding stale fetch resolution");
            return Vec::new();
        }

        let pending = self.pending.take();

        match outcome {
            Ok(snapshot) => {
                self.state = WorkflowState::Idle { snapshot: Some(snapshot) };
                match pending {
                    Some(fetch) if fetch.persist => vec![Effect::Persist(fetch.city)],
                    _ => Vec::new(),
                }
            }
            Err(err) => {
                // Loading must clear on the failure path too; the previous
                // snapshot (possibly none) comes back on display.
                tracing::warn!(%err, "forecast fetch failed");
                let previous = self.take_snapshot();
                self.state = WorkflowState::Idle { snapshot: previous };
                Vec::new()
            }
        }
    }

    /// Extract whatever snapshot the current state carries.
    fn take_snapshot(&mut self) -> Option<WeatherSnapshot> {
        match std::mem::replace(&mut self.state, WorkflowState::Idle { snapshot: None }) {
            WorkflowState::Loading { previous } => previous,
            WorkflowState::Idle { snapshot } => snapshot,
            WorkflowState::SearchOpen { previous, .. } => previous,
        }
    }
}

/// Async engine around [`Workflow`]: executes effects and feeds their
/// completions back as events.
///
/// Search and fetch run as spawned tasks so a newer selection can overtake a
/// slower one; store reads/writes are awaited inline (single reader, single
/// writer, never overlapping).
#[derive(Debug)]
pub struct WeatherApp {
    api: Arc<dyn WeatherApi>,
    store: LastCityStore,
    workflow: Workflow,
    events_tx: UnboundedSender<WorkflowEvent>,
    events_rx: UnboundedReceiver<WorkflowEvent>,
    debouncer: Debouncer<WorkflowEvent>,
}

impl WeatherApp {
    pub fn new(api: Arc<dyn WeatherApi>, store: LastCityStore) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(DEBOUNCE_WINDOW, events_tx.clone());

        Self {
            api,
            store,
            workflow: Workflow::new(),
            events_tx,
            events_rx,
            debouncer,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.workflow.snapshot()
    }

    pub fn candidates(&self) -> &[Location] {
        self.workflow.candidates()
    }

    /// Apply one event and execute the effects it produces.
    pub async fn dispatch(&mut self, event: WorkflowEvent) {
        for effect in self.workflow.apply(event) {
            self.run(effect).await;
        }
    }

    /// Wait for the next completion event and apply it.
    pub async fn tick(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.dispatch(event).await;
        }
    }

    /// Pump completion events until the workflow settles in `Idle`.
    pub async fn run_until_idle(&mut self) {
        while !matches!(self.workflow.state(), WorkflowState::Idle { .. }) {
            self.tick().await;
        }
    }

    async fn run(&mut self, effect: Effect) {
        match effect {
            Effect::LoadStoredCity => {
                let stored = self.store.load().await;
                let _ = self.events_tx.send(WorkflowEvent::StoredCityLoaded(stored));
            }

            Effect::Debounce(query) => {
                self.debouncer.feed(WorkflowEvent::QueryElapsed(query));
            }

            Effect::Search(query) => {
                let api = Arc::clone(&self.api);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let candidates = match api.search(&query).await {
                        Ok(candidates) => candidates,
                        Err(err) => {
                            // Search failure degrades to "no results".
                            tracing::warn!(%err, %query, "location search failed");
                            Vec::new()
                        }
                    };
                    let _ = tx.send(WorkflowEvent::CandidatesLoaded(candidates));
                });
            }

            Effect::Fetch { token, city } => {
                let api = Arc::clone(&self.api);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = api.forecast(&city, FORECAST_DAYS).await;
                    let _ = tx.send(WorkflowEvent::FetchResolved { token, outcome });
                });
            }

            Effect::Persist(city) => {
                if let Err(err) = self.store.save(&city).await {
                    tracing::warn!(%err, %city, "failed to persist selected city");
                }
            }
        }
    }
}

use crate::chart::{self, ChartSpec};
use crate::client::error::FetchError;
use crate::client::PredictionClient;
use crate::domain::catalog::{self, CatalogEntry};
use crate::domain::contract::{PredictionRequest, PredictionResponse};
use crate::domain::prediction::PredictionResult;
use crate::domain::query::{DateRange, TickerQuery};
use crate::domain::recent::RecentSymbols;
use crate::storage::{KeyValueStore, KEY_LAST_SYMBOL, KEY_RECENT_SYMBOLS};
use serde::Serialize;
use std::sync::Arc;

/// The only failure text ever shown to the user.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch prediction. Please check the stock symbol or try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// The single status area below the form. Exactly one variant is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel<'a> {
    Empty,
    Loading,
    Error(&'a str),
    Result(&'a PredictionResult),
}

/// Side effects for the rendering layer to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollToChart,
}

#[derive(Debug)]
pub enum Completion {
    Succeeded { effects: Vec<Effect> },
    Failed(FetchError),
    /// A newer submission or a reset superseded this request; nothing was applied.
    Stale,
}

/// A submission that has moved the controller to `Loading` and awaits its response.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    token: u64,
    query: TickerQuery,
}

impl PendingRequest {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn query(&self) -> &TickerQuery {
        &self.query
    }

    pub async fn fetch(
        &self,
        client: &dyn PredictionClient,
    ) -> Result<PredictionResponse, FetchError> {
        client.predict(&PredictionRequest::from(&self.query)).await
    }
}

pub struct Controller {
    store: Box<dyn KeyValueStore>,
    client: Arc<dyn PredictionClient>,
    symbol: String,
    date_range: DateRange,
    suggestions: Vec<CatalogEntry>,
    recent: RecentSymbols,
    phase: Phase,
    error: Option<&'static str>,
    result: Option<PredictionResult>,
    next_token: u64,
    in_flight: Option<u64>,
}

impl Controller {
    pub fn new(store: impl KeyValueStore + 'static, client: Arc<dyn PredictionClient>) -> Self {
        let recent = RecentSymbols::from_json(store.get(KEY_RECENT_SYMBOLS).as_deref());
        let symbol = store.get(KEY_LAST_SYMBOL).unwrap_or_default();

        tracing::debug!(
            recent = recent.len(),
            last_symbol = %symbol,
            service = client.service_name(),
            "controller initialised"
        );

        Self {
            store: Box::new(store),
            client,
            symbol,
            date_range: DateRange::default(),
            suggestions: Vec::new(),
            recent,
            phase: Phase::Idle,
            error: None,
            result: None,
            next_token: 0,
            in_flight: None,
        }
    }

    /// Keystroke in the symbol field: uppercase, store, recompute suggestions.
    pub fn input(&mut self, raw: &str) {
        self.symbol = raw.to_uppercase();
        self.suggestions = catalog::suggestions(&self.symbol);
        persist(self.store.as_mut(), KEY_LAST_SYMBOL, &self.symbol);
    }

    /// Suggestion, popular shortcut or recent symbol picked. Does not submit.
    pub fn select(&mut self, symbol: &str) {
        self.symbol = symbol.trim().to_uppercase();
        self.suggestions.clear();
        persist(self.store.as_mut(), KEY_LAST_SYMBOL, &self.symbol);
    }

    pub fn set_date_range(&mut self, date_range: DateRange) {
        self.date_range = date_range;
    }

    /// Clears the result, symbol and error. Any in-flight request is orphaned.
    pub fn reset(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!(token, "reset while loading; response will be ignored");
        }
        self.result = None;
        self.symbol.clear();
        self.error = None;
        self.phase = Phase::Idle;
        persist(self.store.as_mut(), KEY_LAST_SYMBOL, "");
    }

    pub fn begin_submit(&mut self) -> anyhow::Result<PendingRequest> {
        let query = TickerQuery::new(&self.symbol, self.date_range)?;

        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.in_flight.replace(token) {
            tracing::debug!(previous, token, "submission supersedes in-flight request");
        }

        self.phase = Phase::Loading;
        self.error = None;
        self.suggestions.clear();

        tracing::info!(
            token,
            symbol = query.symbol(),
            date_range = %query.date_range(),
            "prediction requested"
        );
        Ok(PendingRequest { token, query })
    }

    pub fn finish_submit(
        &mut self,
        pending: PendingRequest,
        outcome: Result<PredictionResponse, FetchError>,
    ) -> Completion {
        if self.in_flight != Some(pending.token) {
            tracing::info!(
                token = pending.token,
                symbol = pending.query.symbol(),
                "dropping stale prediction response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        let validated = outcome.and_then(|response| {
            response
                .validate_and_into_result(&pending.query, chrono::Utc::now())
                .map_err(|err| FetchError::validation("contract", format!("{err:#}")))
        });

        match validated {
            Ok(result) => {
                let symbol = result.symbol().to_string();
                tracing::info!(
                    token = pending.token,
                    %symbol,
                    historical = result.historical_prices().len(),
                    predicted = result.predicted_prices().len(),
                    "prediction applied"
                );

                self.recent.push(&symbol);
                persist(self.store.as_mut(), KEY_RECENT_SYMBOLS, &self.recent.to_json());
                persist(self.store.as_mut(), KEY_LAST_SYMBOL, &symbol);

                self.result = Some(result);
                self.error = None;
                self.phase = Phase::Success;
                Completion::Succeeded {
                    effects: vec![Effect::ScrollToChart],
                }
            }
            Err(err) => {
                tracing::warn!(
                    token = pending.token,
                    symbol = pending.query.symbol(),
                    error = %err,
                    "prediction failed"
                );
                self.result = None;
                self.error = Some(FETCH_FAILED_MESSAGE);
                self.phase = Phase::Error;
                Completion::Failed(err)
            }
        }
    }

    /// Begin, fetch and finish in one go.
    pub async fn submit(&mut self) -> anyhow::Result<Completion> {
        let pending = self.begin_submit()?;
        let client = Arc::clone(&self.client);
        let outcome = pending.fetch(client.as_ref()).await;
        Ok(self.finish_submit(pending, outcome))
    }

    pub fn client(&self) -> Arc<dyn PredictionClient> {
        Arc::clone(&self.client)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn panel(&self) -> Panel<'_> {
        match (self.phase, self.error, self.result.as_ref()) {
            (Phase::Loading, _, _) => Panel::Loading,
            (Phase::Error, Some(message), _) => Panel::Error(message),
            (Phase::Success, _, Some(result)) => Panel::Result(result),
            _ => Panel::Empty,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn error(&self) -> Option<&str> {
        self.error
    }

    pub fn suggestions(&self) -> &[CatalogEntry] {
        &self.suggestions
    }

    pub fn popular(&self) -> &'static [CatalogEntry] {
        catalog::popular_stocks()
    }

    pub fn recent(&self) -> &RecentSymbols {
        &self.recent
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn sentiment(&self) -> &str {
        self.result
            .as_ref()
            .map(|r| r.sentiment().label())
            .unwrap_or("")
    }

    pub fn historical_prices(&self) -> &[f64] {
        self.result
            .as_ref()
            .map(|r| r.historical_prices())
            .unwrap_or(&[])
    }

    pub fn predicted_prices(&self) -> &[f64] {
        self.result
            .as_ref()
            .map(|r| r.predicted_prices())
            .unwrap_or(&[])
    }

    pub fn chart(&self) -> Option<ChartSpec> {
        self.result.as_ref().map(chart::shape)
    }
}

/// Store writes are best-effort; a failure never blocks the state transition.
fn persist(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(key, error = %err, "failed to persist value");
    }
}

use serde::Serialize;

use skyfare_core::{FlightOffer, SearchQuery, ValidationError};

use crate::presenter::rank;
use crate::source::{OfferSet, OfferSource, SourceError};
use crate::token::SearchToken;

pub const SOURCE_ERROR_MESSAGE: &str = "Could not fetch flight data. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Searching,
    Results,
    Empty,
    Error(String),
}

/// Everything the view needs. Replaced wholesale on every transition that
/// changes results, never patched offer by offer.
#[derive(Debug, Clone, Serialize)]
pub struct SearchState {
    pub query: Option<SearchQuery>,
    pub status: SearchStatus,
    /// Ranked by ascending price.
    pub offers: Vec<FlightOffer>,
    pub advisory: Option<String>,
}

impl SearchState {
    fn idle() -> Self {
        Self {
            query: None,
            status: SearchStatus::Idle,
            offers: Vec::new(),
            advisory: None,
        }
    }
}

/// Identifies one `begin`..`complete` cycle.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    token: SearchToken,
}

impl SearchTicket {
    pub fn token(&self) -> &SearchToken {
        &self.token
    }
}

/// Search lifecycle: `Idle → Searching → (Results | Empty | Error) → Idle`.
pub struct SearchSession {
    state: SearchState,
    generation: u64,
    in_flight: Option<SearchToken>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: SearchState::idle(),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Offer at `index` in display order, for the detail view.
    pub fn offer(&self, index: usize) -> Option<&FlightOffer> {
        self.state.offers.get(index)
    }

    /// Enter `Searching`. A search still in flight is cancelled first, and its
    /// completion will be ignored.
    pub fn begin(&mut self, query: SearchQuery) -> SearchTicket {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!("Superseding search #{}", self.generation);
            previous.cancel();
        }

        self.generation += 1;
        let token = SearchToken::new();
        self.in_flight = Some(token.clone());
        self.state = SearchState {
            query: Some(query),
            status: SearchStatus::Searching,
            offers: Vec::new(),
            advisory: None,
        };

        SearchTicket {
            generation: self.generation,
            token,
        }
    }

    /// Apply the outcome of a search. Returns `false` when the ticket is stale
    /// and the outcome was dropped.
    pub fn complete(&mut self, ticket: &SearchTicket, outcome: Result<OfferSet, SourceError>) -> bool {
        if ticket.generation != self.generation || self.state.status != SearchStatus::Searching {
            tracing::debug!("Dropping outcome of stale search #{}", ticket.generation);
            return false;
        }
        self.in_flight = None;

        let query = self.state.query.take();
        self.state = match outcome {
            Ok(set) => {
                let advisory = set.advisory().map(str::to_string);
                let offers = rank(set.offers);
                let status = if offers.is_empty() { SearchStatus::Empty } else { SearchStatus::Results };
                SearchState { query, status, offers, advisory }
            }
            Err(SourceError::Cancelled) => SearchState::idle(),
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                SearchState {
                    query,
                    status: SearchStatus::Error(SOURCE_ERROR_MESSAGE.to_string()),
                    offers: Vec::new(),
                    advisory: None,
                }
            }
        };
        true
    }

    /// Report invalid input without starting a search.
    pub fn fail_validation(&mut self, err: &ValidationError) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.state = SearchState {
            query: None,
            status: SearchStatus::Error(err.to_string()),
            offers: Vec::new(),
            advisory: None,
        };
    }

    /// Back to `Idle`, dropping results and cancelling any search in flight.
    pub fn clear(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.state = SearchState::idle();
    }

    /// Run one complete search against `source`.
    pub async fn run(&mut self, source: &OfferSource, query: SearchQuery) -> &SearchState {
        let ticket = self.begin(query.clone());
        let outcome = source.fetch(&query, ticket.token()).await;
        self.complete(&ticket, outcome);
        &self.state
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

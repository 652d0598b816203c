use serde::Serialize;

use skyfare_core::{FlightOffer, SearchQuery};

use crate::generator::OfferGenerator;
use crate::provider::OfferProvider;
use crate::token::SearchToken;

pub const SYNTHETIC_ADVISORY: &str = "Live prices are unavailable; showing generated sample offers.";

/// Where a result set came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Live { provider: String },
    Synthetic,
}

/// Offers produced by one search, in provider order.
#[derive(Debug, Clone)]
pub struct OfferSet {
    pub offers: Vec<FlightOffer>,
    pub provenance: Provenance,
}

impl OfferSet {
    pub fn advisory(&self) -> Option<&'static str> {
        match self.provenance {
            Provenance::Synthetic => Some(SYNTHETIC_ADVISORY),
            Provenance::Live { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("No flight data source is available: {0}")]
    Unavailable(String),

    #[error("Search was cancelled")]
    Cancelled,
}

/// Providers tried strictly in order, with procedural generation behind them.
pub struct OfferSource {
    providers: Vec<Box<dyn OfferProvider>>,
    generator: Option<OfferGenerator>,
}

impl OfferSource {
    pub fn new(providers: Vec<Box<dyn OfferProvider>>, generator: Option<OfferGenerator>) -> Self {
        Self { providers, generator }
    }

    /// Fetch offers for a validated query.
    ///
    /// Provider failures and empty answers move on to the next provider, then
    /// to generation. Only a cancelled token, or exhausting every provider with
    /// generation disabled, produces an error.
    pub async fn fetch(&self, query: &SearchQuery, token: &SearchToken) -> Result<OfferSet, SourceError> {
        let mut last_error: Option<String> = None;
        let mut answered_empty: Option<String> = None;

        for provider in &self.providers {
            if token.is_cancelled() {
                return Err(SourceError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(SourceError::Cancelled),
                result = provider.fetch_offers(query) => result,
            };

            match result {
                Ok(offers) if !offers.is_empty() => {
                    tracing::info!("{} returned {} offers", provider.name(), offers.len());
                    return Ok(OfferSet {
                        offers,
                        provenance: Provenance::Live { provider: provider.name().to_string() },
                    });
                }
                Ok(_) => {
                    tracing::info!("{} has no offers for {} -> {}", provider.name(), query.origin(), query.destination());
                    if answered_empty.is_none() {
                        answered_empty = Some(provider.name().to_string());
                    }
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", provider.name(), e);
                    last_error = Some(format!("{}: {}", provider.name(), e));
                }
            }
        }

        if token.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        match (&self.generator, answered_empty) {
            (Some(generator), _) => {
                tracing::warn!("Falling back to generated offers");
                Ok(OfferSet {
                    offers: generator.generate(query),
                    provenance: Provenance::Synthetic,
                })
            }
            (None, Some(provider)) => Ok(OfferSet {
                offers: Vec::new(),
                provenance: Provenance::Live { provider },
            }),
            (None, None) => Err(SourceError::Unavailable(
                last_error.unwrap_or_else(|| "no providers configured".to_string()),
            )),
        }
    }
}

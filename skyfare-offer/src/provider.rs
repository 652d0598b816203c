use async_trait::async_trait;
use skyfare_core::{FlightOffer, SearchQuery};

/// A remote source of priced offers. Implementations return normalized
/// offers for the query's departure date only.
#[async_trait]
pub trait OfferProvider: Send + Sync {
    /// Name used in logs and in the provenance of a result set.
    fn name(&self) -> &str;

    async fn fetch_offers(&self, query: &SearchQuery) -> Result<Vec<FlightOffer>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider answered with HTTP {0}")]
    Status(u16),

    #[error("Provider rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

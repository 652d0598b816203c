pub mod iata;
pub mod offer;
pub mod schedule;
pub mod search;

pub use iata::{airline_display_name, IataCode};
pub use offer::{FlightOffer, FlightOfferDraft};
pub use search::{RawSearchInput, SearchQuery, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Inconsistent offer: {0}")]
    InconsistentOffer(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

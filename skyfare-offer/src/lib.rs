pub mod generator;
pub mod presenter;
pub mod price_api;
pub mod provider;
pub mod session;
pub mod source;
pub mod token;

pub use generator::{GenerationConfig, OfferGenerator};
pub use presenter::{DisplayConfig, Presenter};
pub use price_api::{EndpointConfig, PriceApiProvider};
pub use provider::{OfferProvider, ProviderError};
pub use session::{SearchSession, SearchState, SearchStatus};
pub use source::{OfferSet, OfferSource, Provenance, SourceError};
pub use token::SearchToken;

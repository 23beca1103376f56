// Adapters layer: HTTP clients for the external data providers and the tip generator.

pub mod attom;
pub mod census;
pub mod crime;
pub mod http;
pub mod openai;
pub mod places;
pub mod walkscore;

pub use attom::{AttomComparablesProvider, AttomMarketProvider};
pub use census::CensusProvider;
pub use crime::FbiCrimeProvider;
pub use http::ApiClient;
pub use openai::OpenAiTipGenerator;
pub use places::GeoapifyPlacesProvider;
pub use walkscore::WalkScoreProvider;

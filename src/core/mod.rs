pub mod demo;
pub mod engine;
pub mod fallback;
pub mod insights;
pub mod quality;

pub use crate::domain::location::Location;
pub use crate::domain::model::NeighborhoodProfile;
pub use crate::domain::ports::{Provider, Providers, TipGenerator};
pub use engine::{NeighborhoodEngine, DEFAULT_DEADLINE};

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use crate::app::build_engine;
pub use config::AppConfig;
pub use crate::core::{Location, NeighborhoodEngine, NeighborhoodProfile};
pub use utils::error::{InsightsError, Result};

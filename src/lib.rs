//! Exercise Helper - flash-loan backed settlement of discount options
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::ExerciseService;
pub use domain::quote::QuoteEngine;
pub use domain::route::RouteCalculator;
pub use domain::settlement::ExerciseHelper;
pub use infrastructure::chain::Chain;
#[cfg(any(test, feature = "sim"))]
pub use infrastructure::chain::SimulatedChain;
pub use shared::config::HelperConfig;
pub use shared::errors::{HelperError, HelperResult};

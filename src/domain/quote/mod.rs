//! Quote domain - strike cost and profit estimates

mod quote_engine;

pub use quote_engine::{LpPlan, QuoteEngine, StrikeQuote};

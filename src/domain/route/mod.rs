//! Route domain - multi-hop amount calculation

mod route_calculator;

pub use route_calculator::RouteCalculator;

//! Infrastructure layer - external capabilities and their simulation

pub mod chain;

//! Settlement domain - the helper's public entry points

mod settlement_engine;

#[cfg(test)]
pub(crate) mod testing;

pub use settlement_engine::ExerciseHelper;

//! State module for tracking run progress
//!
//! `RunPhase` names where the run loop currently is. The coordinator moves
//! through the phases in a fixed order and logs every transition at trace level.

mod run_phase;

pub use run_phase::RunPhase;

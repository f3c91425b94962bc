//! Behavioural step helpers for engine-info scenarios.

mod assertions;
mod state;

pub use state::{EngineInfoState, engine_info_state};

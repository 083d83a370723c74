//! Lane Tactician - real-time decision fusion for a two-lane card game player

pub mod advisors;
pub mod cards;
pub mod core;
pub mod fusion;
pub mod state;

pub use crate::core::{load_config, EngineConfig, EngineError, Result};
pub use crate::fusion::{DecisionEngine, FusedAction};
pub use crate::state::GameSnapshot;

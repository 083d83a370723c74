//! Decision fusion: merges subsystem recommendations into one action per tick

pub mod cache;
pub mod engine;
pub mod recommendation;
pub mod weights;

pub use cache::DecisionCache;
pub use engine::{ComboProgress, DecisionEngine, EngineStatus, OutcomeRecord};
pub use recommendation::{ActionKind, ActionRecommendation, FusedAction, Rationale, ScoredRecommendation};
pub use weights::SubsystemWeights;

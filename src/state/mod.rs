//! Match state as seen by the decision engine

pub mod fingerprint;
pub mod geometry;
pub mod snapshot;
pub mod watermark;

pub use fingerprint::SnapshotFingerprint;
pub use snapshot::{BoardUnit, GameSnapshot, HandCard, PlayRecord, TowerHealth};
pub use watermark::PlayWatermark;

//! Snapshot fingerprint used as the decision cache key

use serde::Serialize;

use crate::core::config::FusionConfig;
use crate::core::types::{CardId, Side, Tile};
use crate::state::snapshot::GameSnapshot;

/// Materially relevant parts of a snapshot, bucketed and order-independent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotFingerprint {
    pub time_bucket: i64,
    pub elixir_bucket: i64,
    pub hand: Vec<(CardId, bool)>,
    pub units: Vec<(CardId, Side, Tile)>,
}

impl SnapshotFingerprint {
    pub fn of(snapshot: &GameSnapshot, config: &FusionConfig) -> Self {
        let mut hand: Vec<(CardId, bool)> = snapshot
            .hand
            .iter()
            .map(|h| (h.card.clone(), h.ready))
            .collect();
        hand.sort();

        let mut units: Vec<(CardId, Side, Tile)> = snapshot
            .units
            .iter()
            .map(|u| (u.card.clone(), u.owner, u.tile))
            .collect();
        units.sort();

        Self {
            time_bucket: (snapshot.elapsed / config.time_bucket).floor() as i64,
            elixir_bucket: (snapshot.own_elixir / config.elixir_bucket).floor() as i64,
            hand,
            units,
        }
    }
}

//! Per-tick match snapshot produced by the capture layer

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{CardId, Seconds, Side, Tile};
use crate::state::geometry;

/// Health fraction of every tower, 1.0 = full
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerHealth {
    pub own_left: f32,
    pub own_right: f32,
    pub own_king: f32,
    pub enemy_left: f32,
    pub enemy_right: f32,
    pub enemy_king: f32,
}

impl Default for TowerHealth {
    fn default() -> Self {
        Self {
            own_left: 1.0,
            own_right: 1.0,
            own_king: 1.0,
            enemy_left: 1.0,
            enemy_right: 1.0,
            enemy_king: 1.0,
        }
    }
}

impl TowerHealth {
    fn fields_mut(&mut self) -> [&mut f32; 6] {
        [
            &mut self.own_left,
            &mut self.own_right,
            &mut self.own_king,
            &mut self.enemy_left,
            &mut self.enemy_right,
            &mut self.enemy_king,
        ]
    }
}

/// A unit standing on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardUnit {
    pub id: u32,
    pub card: CardId,
    pub owner: Side,
    pub tile: Tile,
    /// Fraction of full health
    #[serde(default = "full_health")]
    pub health: f32,
}

fn full_health() -> f32 {
    1.0
}

impl BoardUnit {
    pub fn new(id: u32, card: &str, owner: Side, tile: Tile) -> Self {
        Self {
            id,
            card: CardId::from(card),
            owner,
            tile,
            health: 1.0,
        }
    }
}

/// A card slot in the own hand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandCard {
    pub card: CardId,
    /// False while the card is still cycling in
    #[serde(default = "ready_by_default")]
    pub ready: bool,
}

fn ready_by_default() -> bool {
    true
}

impl HandCard {
    pub fn ready(card: &str) -> Self {
        Self {
            card: CardId::from(card),
            ready: true,
        }
    }

    pub fn cooling(card: &str) -> Self {
        Self {
            card: CardId::from(card),
            ready: false,
        }
    }
}

/// One observed card play; immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub card: CardId,
    pub tile: Tile,
    pub timestamp: Seconds,
    pub owner: Side,
}

impl PlayRecord {
    pub fn new(card: &str, tile: Tile, timestamp: Seconds, owner: Side) -> Self {
        Self {
            card: CardId::from(card),
            tile,
            timestamp,
            owner,
        }
    }
}

/// Match state observed in one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Seconds since the match started
    pub elapsed: Seconds,
    pub own_elixir: f32,
    /// Capture layer estimate; the economy tracker keeps its own
    #[serde(default)]
    pub enemy_elixir: f32,
    #[serde(default)]
    pub towers: TowerHealth,
    #[serde(default)]
    pub units: Vec<BoardUnit>,
    pub hand: Vec<HandCard>,
    #[serde(default)]
    pub own_history: Vec<PlayRecord>,
    #[serde(default)]
    pub enemy_history: Vec<PlayRecord>,
}

impl GameSnapshot {
    /// Empty board at the given match time with mid-range elixir
    pub fn at(elapsed: Seconds) -> Self {
        Self {
            elapsed,
            own_elixir: 5.0,
            enemy_elixir: 5.0,
            towers: TowerHealth::default(),
            units: Vec::new(),
            hand: Vec::new(),
            own_history: Vec::new(),
            enemy_history: Vec::new(),
        }
    }

    pub fn with_hand(mut self, cards: &[&str]) -> Self {
        self.hand = cards.iter().map(|c| HandCard::ready(c)).collect();
        self
    }

    pub fn enemy_units(&self) -> impl Iterator<Item = &BoardUnit> {
        self.units.iter().filter(|u| u.owner == Side::Enemy)
    }

    pub fn own_units(&self) -> impl Iterator<Item = &BoardUnit> {
        self.units.iter().filter(|u| u.owner == Side::Own)
    }

    pub fn ready_cards(&self) -> impl Iterator<Item = &CardId> {
        self.hand.iter().filter(|h| h.ready).map(|h| &h.card)
    }

    pub fn has_ready(&self, card: &CardId) -> bool {
        self.hand.iter().any(|h| h.ready && &h.card == card)
    }

    pub fn is_occupied(&self, tile: Tile) -> bool {
        self.units.iter().any(|u| u.tile == tile)
    }

    /// Reject snapshots the engine cannot reason about
    ///
    /// Only non-finite numbers are fatal; out-of-range values are clamped
    /// by `sanitized`.
    pub fn validate(&self) -> Result<()> {
        if !self.elapsed.is_finite() || self.elapsed < 0.0 {
            return Err(EngineError::MalformedSnapshot(format!(
                "elapsed time {} is not a valid match time",
                self.elapsed
            )));
        }

        if !self.own_elixir.is_finite() {
            return Err(EngineError::MalformedSnapshot(
                "own elixir is not a number".into(),
            ));
        }

        if let Some(unit) = self.units.iter().find(|u| !u.health.is_finite()) {
            return Err(EngineError::MalformedSnapshot(format!(
                "unit {} has non-finite health",
                unit.id
            )));
        }

        let bad_play = self
            .own_history
            .iter()
            .chain(self.enemy_history.iter())
            .find(|p| !p.timestamp.is_finite());
        if let Some(play) = bad_play {
            return Err(EngineError::MalformedSnapshot(format!(
                "play of '{}' has a non-finite timestamp",
                play.card
            )));
        }

        Ok(())
    }

    /// Copy with elixir, health and positions clamped to their legal ranges
    ///
    /// Returns the copy and whether anything had to change.
    pub fn sanitized(&self, max_elixir: f32) -> (GameSnapshot, bool) {
        let mut clean = self.clone();
        let mut changed = false;

        let mut clamp = |value: &mut f32, lo: f32, hi: f32| {
            let fixed = if value.is_nan() { lo } else { value.clamp(lo, hi) };
            if fixed != *value {
                *value = fixed;
                changed = true;
            }
        };

        clamp(&mut clean.own_elixir, 0.0, max_elixir);
        clamp(&mut clean.enemy_elixir, 0.0, max_elixir);
        for tower in clean.towers.fields_mut() {
            clamp(tower, 0.0, 1.0);
        }
        for unit in &mut clean.units {
            clamp(&mut unit.health, 0.0, 1.0);
        }

        for unit in &mut clean.units {
            let tile = geometry::clamp_to_board(unit.tile);
            if tile != unit.tile {
                unit.tile = tile;
                changed = true;
            }
        }

        (clean, changed)
    }
}

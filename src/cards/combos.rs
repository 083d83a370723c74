//! Combo definitions: ordered card sequences with timing offsets

use serde::{Deserialize, Serialize};

use crate::cards::catalog::CardCatalog;
use crate::cards::roles::Role;
use crate::core::types::CardId;
use crate::state::GameSnapshot;

/// Condition that must hold before a combo may start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboTrigger {
    /// No precondition
    Always,
    /// Own elixir at or above the value
    OwnElixirAtLeast(f32),
    /// Own elixir minus estimated enemy elixir at or above the value
    ElixirAdvantageAtLeast(f32),
    /// Estimated enemy elixir strictly below the value
    EnemyElixirBelow(f32),
    /// No enemy tank on the board
    NoEnemyTanks,
    /// Every nested condition holds
    All(Vec<ComboTrigger>),
}

impl ComboTrigger {
    /// Check if the condition is met against the current snapshot
    pub fn is_satisfied(&self, snapshot: &GameSnapshot, catalog: &CardCatalog) -> bool {
        match self {
            ComboTrigger::Always => true,
            ComboTrigger::OwnElixirAtLeast(value) => snapshot.own_elixir >= *value,
            ComboTrigger::ElixirAdvantageAtLeast(value) => {
                snapshot.own_elixir - snapshot.enemy_elixir >= *value
            }
            ComboTrigger::EnemyElixirBelow(value) => snapshot.enemy_elixir < *value,
            ComboTrigger::NoEnemyTanks => !snapshot
                .enemy_units()
                .any(|u| catalog.roles(&u.card).contains(Role::Tank)),
            ComboTrigger::All(conditions) => {
                conditions.iter().all(|c| c.is_satisfied(snapshot, catalog))
            }
        }
    }
}

/// Where follow-up combo cards go relative to the previous combo card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboPlacement {
    /// Two tiles behind the previous card, same column
    #[default]
    Behind,
    /// One tile ahead of the previous card
    Ahead,
    /// Two tiles toward the board center
    Beside,
    /// On the enemy princess tower of the previous card's lane
    EnemyTower,
}

/// A named multi-card combo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub name: String,
    /// Cards in play order
    pub cards: Vec<CardId>,
    /// Per-step delay from sequence start (seconds), same length as `cards`
    pub delays: Vec<f32>,
    #[serde(default = "default_trigger")]
    pub trigger: ComboTrigger,
    /// 0.0 to 1.0
    pub effectiveness: f32,
    #[serde(default)]
    pub placement: ComboPlacement,
}

fn default_trigger() -> ComboTrigger {
    ComboTrigger::Always
}

impl ComboDefinition {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Delay of the last step; the sequence should be over by then
    pub fn final_delay(&self) -> f32 {
        self.delays.last().copied().unwrap_or(0.0)
    }

    /// Total elixir the combo spends
    pub fn total_cost(&self, catalog: &CardCatalog) -> f32 {
        self.cards.iter().map(|c| catalog.cost(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BoardUnit, GameSnapshot};
    use crate::core::types::{Side, Tile};

    #[test]
    fn test_elixir_triggers() {
        let catalog = CardCatalog::standard();
        let mut snapshot = GameSnapshot::at(30.0);
        snapshot.own_elixir = 8.0;
        snapshot.enemy_elixir = 5.0;

        assert!(ComboTrigger::OwnElixirAtLeast(8.0).is_satisfied(&snapshot, &catalog));
        assert!(ComboTrigger::ElixirAdvantageAtLeast(3.0).is_satisfied(&snapshot, &catalog));
        assert!(!ComboTrigger::ElixirAdvantageAtLeast(3.5).is_satisfied(&snapshot, &catalog));
        assert!(!ComboTrigger::EnemyElixirBelow(5.0).is_satisfied(&snapshot, &catalog));
    }

    #[test]
    fn test_no_enemy_tanks_trigger() {
        let catalog = CardCatalog::standard();
        let mut snapshot = GameSnapshot::at(30.0);
        assert!(ComboTrigger::NoEnemyTanks.is_satisfied(&snapshot, &catalog));

        snapshot
            .units
            .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 20)));
        assert!(!ComboTrigger::NoEnemyTanks.is_satisfied(&snapshot, &catalog));
    }

    #[test]
    fn test_all_trigger_requires_every_condition() {
        let catalog = CardCatalog::standard();
        let mut snapshot = GameSnapshot::at(30.0);
        snapshot.own_elixir = 6.0;
        snapshot.enemy_elixir = 2.0;
        let trigger = ComboTrigger::All(vec![
            ComboTrigger::OwnElixirAtLeast(5.0),
            ComboTrigger::EnemyElixirBelow(3.0),
        ]);
        assert!(trigger.is_satisfied(&snapshot, &catalog));

        snapshot.enemy_elixir = 4.0;
        assert!(!trigger.is_satisfied(&snapshot, &catalog));
    }
}

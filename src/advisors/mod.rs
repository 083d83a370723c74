//! Heuristic subsystems consulted by the decision engine every tick
//!
//! Each subsystem implements [`Advisor`]: it looks at the current tick and
//! proposes zero or more [`ActionRecommendation`]s. Subsystems never talk to
//! each other; the fusion engine is the only consumer of their output.

pub mod combo;
pub mod economy;
pub mod opponent;
pub mod phase;
pub mod positioning;
pub mod threat;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardStats};
use crate::core::config::EngineConfig;
use crate::core::types::CardId;
use crate::fusion::{ActionRecommendation, FusedAction};
use crate::state::GameSnapshot;

pub use combo::{ActiveCombo, ComboSequencer, ComboStart};
pub use economy::{EconomyTracker, SpendDecision, SpendReason};
pub use opponent::{OpponentModel, Prediction};
pub use phase::{modifiers_for, phase_for, Phase, PhaseController, PhaseModifiers, RoleMultipliers};
pub use positioning::{Intent, PositioningAdvisor, PositioningEngine};
pub use threat::{ThreatAssessment, ThreatPrioritizer, ThreatTier};

/// Identity of a subsystem, used for weights, toggles and attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorKind {
    OpponentModel,
    Economy,
    ComboSequencer,
    ThreatPrioritizer,
    Positioning,
    PhaseControl,
}

impl AdvisorKind {
    pub const ALL: [AdvisorKind; 6] = [
        AdvisorKind::OpponentModel,
        AdvisorKind::Economy,
        AdvisorKind::ComboSequencer,
        AdvisorKind::ThreatPrioritizer,
        AdvisorKind::Positioning,
        AdvisorKind::PhaseControl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AdvisorKind::OpponentModel => "opponent_model",
            AdvisorKind::Economy => "economy",
            AdvisorKind::ComboSequencer => "combo_sequencer",
            AdvisorKind::ThreatPrioritizer => "threat_prioritizer",
            AdvisorKind::Positioning => "positioning",
            AdvisorKind::PhaseControl => "phase_control",
        }
    }
}

impl fmt::Display for AdvisorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view of one tick handed to every advisor
pub struct TickContext<'a> {
    pub snapshot: &'a GameSnapshot,
    pub catalog: &'a CardCatalog,
    pub config: &'a EngineConfig,
    pub positioning: &'a PositioningEngine,
    pub phase: Phase,
    pub modifiers: PhaseModifiers,
}

impl<'a> TickContext<'a> {
    pub fn new(
        snapshot: &'a GameSnapshot,
        catalog: &'a CardCatalog,
        config: &'a EngineConfig,
        positioning: &'a PositioningEngine,
    ) -> Self {
        let phase = phase_for(snapshot.elapsed);
        Self {
            snapshot,
            catalog,
            config,
            positioning,
            phase,
            modifiers: modifiers_for(phase),
        }
    }

    /// Ready in hand and affordable right now
    pub fn can_play(&self, card: &CardId) -> bool {
        self.snapshot.has_ready(card) && self.catalog.cost(card) <= self.snapshot.own_elixir
    }

    /// Catalogued cards that can be played right now, in hand order
    pub fn playable(&self) -> impl Iterator<Item = &'a CardStats> + 'a {
        let catalog = self.catalog;
        let elixir = self.snapshot.own_elixir;
        self.snapshot
            .ready_cards()
            .filter_map(move |id| catalog.get(id))
            .filter(move |stats| stats.elixir() <= elixir)
    }
}

/// Uniform capability every subsystem exposes to the fusion engine
pub trait Advisor {
    fn kind(&self) -> AdvisorKind;

    /// Proposals for this tick; empty when the subsystem has nothing to say
    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation>;

    /// Called with the action the engine emitted this tick
    fn on_emitted(&mut self, _action: &FusedAction, _ctx: &TickContext) {}
}

/// All subsystems in registration order
#[derive(Debug, Clone)]
pub struct AdvisorSet {
    pub opponent: OpponentModel,
    pub economy: EconomyTracker,
    pub combos: ComboSequencer,
    pub threats: ThreatPrioritizer,
    pub positioning: PositioningAdvisor,
    pub phase: PhaseController,
}

impl AdvisorSet {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            opponent: OpponentModel::new(config.opponent.clone()),
            economy: EconomyTracker::new(config.economy.clone()),
            combos: ComboSequencer::new(config.combos.clone()),
            threats: ThreatPrioritizer::new(config.threats.clone()),
            positioning: PositioningAdvisor::new(),
            phase: PhaseController::new(config.economy.max_elixir),
        }
    }

    pub fn iter_mut(&mut self) -> [&mut dyn Advisor; 6] {
        [
            &mut self.opponent,
            &mut self.economy,
            &mut self.combos,
            &mut self.threats,
            &mut self.positioning,
            &mut self.phase,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_set_order_matches_kinds() {
        let mut set = AdvisorSet::new(&EngineConfig::default());
        let kinds: Vec<AdvisorKind> = set.iter_mut().iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, AdvisorKind::ALL.to_vec());
    }

    #[test]
    fn test_can_play_requires_ready_and_elixir() {
        let catalog = CardCatalog::standard();
        let config = EngineConfig::default();
        let positioning = PositioningEngine::default();
        let mut snapshot = GameSnapshot::at(10.0).with_hand(&["giant", "knight"]);
        snapshot.own_elixir = 4.0;

        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);
        assert!(ctx.can_play(&CardId::from("knight")));
        assert!(!ctx.can_play(&CardId::from("giant")));
        assert!(!ctx.can_play(&CardId::from("fireball")));
        assert_eq!(ctx.playable().count(), 1);
    }
}

//! Threat prioritizer: danger tiers for enemy units and in-hand counters

use std::fmt;

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::advisors::positioning::Intent;
use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::{CardCatalog, Role, ThreatClass};
use crate::core::config::ThreatConfig;
use crate::core::types::{CardId, Tile};
use crate::fusion::{ActionRecommendation, Rationale};
use crate::state::geometry;
use crate::state::GameSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatTier {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatTier {
    pub fn confidence(&self) -> f32 {
        match self {
            ThreatTier::Critical => 0.95,
            ThreatTier::High => 0.8,
            ThreatTier::Medium => 0.55,
            ThreatTier::Low => 0.3,
        }
    }

    fn intent(&self) -> Intent {
        match self {
            ThreatTier::High => Intent::Blocking,
            _ => Intent::Defensive,
        }
    }
}

impl fmt::Display for ThreatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatTier::Low => "low",
            ThreatTier::Medium => "medium",
            ThreatTier::High => "high",
            ThreatTier::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One enemy unit's danger, recomputed every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub unit_id: u32,
    pub card: CardId,
    pub tile: Tile,
    pub tier: ThreatTier,
    pub class: ThreatClass,
    /// Ready in-hand counters, best first; may be empty
    pub counters: Vec<CardId>,
    /// Distance to the nearer own princess tower
    pub distance: f32,
}

/// Counters for `class` that are ready in hand, in table order
pub fn counters_for(catalog: &CardCatalog, class: ThreatClass, snapshot: &GameSnapshot) -> Vec<CardId> {
    catalog
        .counters()
        .counters(class)
        .iter()
        .filter(|c| snapshot.has_ready(c))
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct ThreatPrioritizer {
    config: ThreatConfig,
}

impl ThreatPrioritizer {
    pub fn new(config: ThreatConfig) -> Self {
        Self { config }
    }

    /// One assessment per enemy unit, most dangerous first
    ///
    /// Within a tier the unit closer to an own tower comes first.
    pub fn assess(&self, snapshot: &GameSnapshot, catalog: &CardCatalog) -> Vec<ThreatAssessment> {
        let mut threats: Vec<ThreatAssessment> = snapshot
            .enemy_units()
            .map(|unit| {
                let distance = geometry::distance_to_own_tower(unit.tile);
                let (tier, class) = match catalog.get(&unit.card) {
                    Some(stats) => {
                        let tier = if stats.has_role(Role::Tank)
                            && distance <= self.config.critical_distance
                        {
                            ThreatTier::Critical
                        } else if stats.has_role(Role::WinCondition) && stats.is_fast() {
                            ThreatTier::High
                        } else if stats.has_role(Role::Support) {
                            ThreatTier::Medium
                        } else {
                            ThreatTier::Low
                        };
                        (tier, stats.threat_class())
                    }
                    None => (ThreatTier::Low, ThreatClass::Other),
                };

                ThreatAssessment {
                    unit_id: unit.id,
                    card: unit.card.clone(),
                    tile: unit.tile,
                    tier,
                    class,
                    counters: counters_for(catalog, class, snapshot),
                    distance,
                }
            })
            .collect();

        threats.sort_by(|a, b| {
            b.tier
                .cmp(&a.tier)
                .then_with(|| OrderedFloat(a.distance).cmp(&OrderedFloat(b.distance)))
                .then_with(|| a.unit_id.cmp(&b.unit_id))
        });
        threats
    }
}

impl Advisor for ThreatPrioritizer {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::ThreatPrioritizer
    }

    /// Independent counters for the top threats, never the same card twice
    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        let threats = self.assess(ctx.snapshot, ctx.catalog);
        let mut committed: AHashSet<CardId> = AHashSet::new();
        let mut recs = Vec::new();

        for threat in threats
            .iter()
            .filter(|t| t.tier >= ThreatTier::Medium)
            .take(self.config.top_n)
        {
            let counter = threat
                .counters
                .iter()
                .filter(|c| !committed.contains(*c))
                .filter_map(|c| ctx.catalog.get(c))
                .find(|stats| stats.elixir() <= ctx.snapshot.own_elixir);

            let Some(counter) = counter else {
                tracing::debug!("No playable counter for {} ({})", threat.card, threat.tier);
                continue;
            };

            let intent = threat.tier.intent();
            let lane = geometry::lane_of(threat.tile);
            let target = if counter.is_spell() {
                ctx.positioning.place_near(counter, threat.tile, ctx.snapshot)
            } else {
                ctx.positioning.position_in_lane(counter, intent, lane, ctx.snapshot)
            };
            let Some(target) = target else {
                continue;
            };

            committed.insert(counter.id.clone());
            recs.push(ActionRecommendation::play(
                AdvisorKind::ThreatPrioritizer,
                counter.id.clone(),
                target,
                intent,
                threat.tier.confidence(),
                Rationale::DefendThreat {
                    tier: threat.tier,
                    threat: threat.card.clone(),
                },
            ));
        }

        recs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisors::PositioningEngine;
    use crate::core::config::EngineConfig;
    use crate::core::types::Side;
    use crate::state::BoardUnit;

    #[test]
    fn test_tank_near_tower_is_critical() {
        let catalog = CardCatalog::standard();
        let prioritizer = ThreatPrioritizer::new(ThreatConfig::default());
        let mut snapshot = GameSnapshot::at(90.0).with_hand(&["inferno_tower", "zap"]);
        snapshot
            .units
            .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 10)));

        let threats = prioritizer.assess(&snapshot, &catalog);
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].tier, ThreatTier::Critical);
        assert_eq!(threats[0].counters, vec![CardId::from("inferno_tower")]);
    }

    #[test]
    fn test_far_tank_is_not_critical() {
        let catalog = CardCatalog::standard();
        let prioritizer = ThreatPrioritizer::new(ThreatConfig::default());
        let mut snapshot = GameSnapshot::at(90.0);
        snapshot
            .units
            .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 22)));

        let threats = prioritizer.assess(&snapshot, &catalog);
        assert_eq!(threats[0].tier, ThreatTier::Low);
        assert!(threats[0].counters.is_empty());
    }

    #[test]
    fn test_ordering_by_tier_then_distance() {
        let catalog = CardCatalog::standard();
        let prioritizer = ThreatPrioritizer::new(ThreatConfig::default());
        let mut snapshot = GameSnapshot::at(90.0);
        snapshot.units = vec![
            BoardUnit::new(1, "musketeer", Side::Enemy, Tile::new(4, 20)),
            BoardUnit::new(2, "hog_rider", Side::Enemy, Tile::new(14, 22)),
            BoardUnit::new(3, "musketeer", Side::Enemy, Tile::new(14, 12)),
            BoardUnit::new(4, "knight", Side::Enemy, Tile::new(3, 8)),
        ];

        let order: Vec<u32> = prioritizer
            .assess(&snapshot, &catalog)
            .iter()
            .map(|t| t.unit_id)
            .collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_top_threats_get_distinct_counters() {
        let catalog = CardCatalog::standard();
        let config = EngineConfig::default();
        let positioning = PositioningEngine::default();
        let mut prioritizer = ThreatPrioritizer::new(ThreatConfig::default());

        let mut snapshot = GameSnapshot::at(90.0).with_hand(&["cannon", "tesla", "zap", "knight"]);
        snapshot.own_elixir = 10.0;
        snapshot.units = vec![
            BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 10)),
            BoardUnit::new(2, "giant", Side::Enemy, Tile::new(13, 10)),
        ];

        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);
        let recs = prioritizer.advise(&ctx);
        assert_eq!(recs.len(), 2);
        assert_ne!(recs[0].card, recs[1].card);
        assert!(recs.iter().all(|r| r.confidence == 0.95));
    }

    #[test]
    fn test_no_counter_in_hand_is_not_an_error() {
        let catalog = CardCatalog::standard();
        let config = EngineConfig::default();
        let positioning = PositioningEngine::default();
        let mut prioritizer = ThreatPrioritizer::new(ThreatConfig::default());

        let mut snapshot = GameSnapshot::at(90.0).with_hand(&["fireball"]);
        snapshot
            .units
            .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 10)));
        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);
        assert!(prioritizer.advise(&ctx).is_empty());
    }
}

//! Opponent deck archetypes and their role signatures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::catalog::CardStats;
use crate::cards::roles::{CardKind, Role, Targets};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Beatdown,
    BridgeSpam,
    Siege,
    SpellBait,
    AirAttack,
    Balanced,
    #[default]
    Unknown,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Archetype::Beatdown => "beatdown",
            Archetype::BridgeSpam => "bridge_spam",
            Archetype::Siege => "siege",
            Archetype::SpellBait => "spell_bait",
            Archetype::AirAttack => "air_attack",
            Archetype::Balanced => "balanced",
            Archetype::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A single property a card may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTrait {
    Role(Role),
    Kind(CardKind),
    Air,
    Fast,
    TargetsBuildings,
    MinCost(u8),
}

impl CardTrait {
    pub fn matches(&self, card: &CardStats) -> bool {
        match self {
            CardTrait::Role(role) => card.roles.contains(*role),
            CardTrait::Kind(kind) => card.kind == *kind,
            CardTrait::Air => card.air,
            CardTrait::Fast => card.is_fast(),
            CardTrait::TargetsBuildings => card.targets == Targets::Buildings,
            CardTrait::MinCost(cost) => card.cost >= *cost,
        }
    }
}

/// At least `min` seen cards must carry every trait in `traits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRequirement {
    pub traits: Vec<CardTrait>,
    pub min: usize,
}

impl TraitRequirement {
    pub fn is_met(&self, seen: &[&CardStats]) -> bool {
        let count = seen
            .iter()
            .filter(|card| self.traits.iter().all(|t| t.matches(card)))
            .count();
        count >= self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSignature {
    pub archetype: Archetype,
    pub requirements: Vec<TraitRequirement>,
}

impl ArchetypeSignature {
    pub fn matches(&self, seen: &[&CardStats]) -> bool {
        self.requirements.iter().all(|r| r.is_met(seen))
    }
}

/// First fully matched signature wins; no match means a balanced deck
pub fn classify(signatures: &[ArchetypeSignature], seen: &[&CardStats]) -> Archetype {
    signatures
        .iter()
        .find(|s| s.matches(seen))
        .map(|s| s.archetype)
        .unwrap_or(Archetype::Balanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;
    use crate::core::types::CardId;

    fn classify_names(names: &[&str]) -> Archetype {
        let catalog = CardCatalog::standard();
        let seen: Vec<&CardStats> = names
            .iter()
            .filter_map(|n| catalog.get(&CardId::from(*n)))
            .collect();
        classify(catalog.archetypes(), &seen)
    }

    #[test]
    fn test_siege_detected_from_xbow() {
        assert_eq!(classify_names(&["x_bow", "tesla", "archers"]), Archetype::Siege);
    }

    #[test]
    fn test_air_attack_detected() {
        assert_eq!(
            classify_names(&["lava_hound", "balloon", "minions"]),
            Archetype::AirAttack
        );
    }

    #[test]
    fn test_beatdown_detected() {
        assert_eq!(
            classify_names(&["golem", "night_witch", "lightning"]),
            Archetype::Beatdown
        );
    }

    #[test]
    fn test_unmatched_cards_are_balanced() {
        assert_eq!(
            classify_names(&["knight", "musketeer", "fireball"]),
            Archetype::Balanced
        );
    }
}

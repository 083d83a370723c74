//! Static counter table keyed by threat class

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::catalog::CardStats;
use crate::cards::roles::{CardKind, Role, Targets};
use crate::core::types::CardId;

/// Threat sub-type used to look up counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatClass {
    Tank,
    FastWinCondition,
    AirWinCondition,
    BuildingTargeter,
    Swarm,
    Air,
    Siege,
    Support,
    Other,
}

impl ThreatClass {
    /// Classify a card by role first, then by sub-type
    pub fn of(card: &CardStats) -> Self {
        let roles = &card.roles;
        if card.kind == CardKind::Building && roles.contains(Role::WinCondition) {
            ThreatClass::Siege
        } else if card.air && roles.contains(Role::WinCondition) {
            ThreatClass::AirWinCondition
        } else if roles.contains(Role::Tank) {
            ThreatClass::Tank
        } else if roles.contains(Role::WinCondition) && card.is_fast() {
            ThreatClass::FastWinCondition
        } else if card.targets == Targets::Buildings {
            ThreatClass::BuildingTargeter
        } else if roles.contains(Role::Swarm) {
            ThreatClass::Swarm
        } else if card.air {
            ThreatClass::Air
        } else if roles.contains(Role::Support) {
            ThreatClass::Support
        } else {
            ThreatClass::Other
        }
    }
}

/// One row of the counter table as written in catalog files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterEntry {
    pub threat: ThreatClass,
    pub cards: Vec<CardId>,
}

/// Ranked counters per threat class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CounterEntry>", into = "Vec<CounterEntry>")]
pub struct CounterTable {
    entries: AHashMap<ThreatClass, Vec<CardId>>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, threat: ThreatClass, cards: Vec<CardId>) {
        self.entries.insert(threat, cards);
    }

    /// Ranked counters for a class, best first; empty if none listed
    pub fn counters(&self, threat: ThreatClass) -> &[CardId] {
        self.entries.get(&threat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &CardId> {
        self.entries.values().flatten()
    }
}

impl From<Vec<CounterEntry>> for CounterTable {
    fn from(entries: Vec<CounterEntry>) -> Self {
        let mut table = CounterTable::new();
        for entry in entries {
            table.insert(entry.threat, entry.cards);
        }
        table
    }
}

impl From<CounterTable> for Vec<CounterEntry> {
    fn from(table: CounterTable) -> Self {
        let mut entries: Vec<CounterEntry> = table
            .entries
            .into_iter()
            .map(|(threat, cards)| CounterEntry { threat, cards })
            .collect();
        entries.sort_by_key(|e| e.threat);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;

    fn class_of(name: &str) -> ThreatClass {
        let catalog = CardCatalog::standard();
        ThreatClass::of(catalog.get(&CardId::from(name)).unwrap())
    }

    #[test]
    fn test_threat_classes_of_standard_cards() {
        assert_eq!(class_of("giant"), ThreatClass::Tank);
        assert_eq!(class_of("hog_rider"), ThreatClass::FastWinCondition);
        assert_eq!(class_of("balloon"), ThreatClass::AirWinCondition);
        assert_eq!(class_of("lava_hound"), ThreatClass::AirWinCondition);
        assert_eq!(class_of("x_bow"), ThreatClass::Siege);
        assert_eq!(class_of("skeleton_army"), ThreatClass::Swarm);
        assert_eq!(class_of("musketeer"), ThreatClass::Support);
    }

    #[test]
    fn test_missing_class_has_no_counters() {
        let table = CounterTable::new();
        assert!(table.counters(ThreatClass::Tank).is_empty());
    }
}

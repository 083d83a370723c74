//! Card catalog: static card stats, combos, counters and archetypes
//!
//! The catalog is immutable once built. `validate()` runs once when the
//! decision engine is constructed, never on the per-tick path.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::archetypes::ArchetypeSignature;
use crate::cards::combos::ComboDefinition;
use crate::cards::counters::{CounterTable, ThreatClass};
use crate::cards::roles::{CardKind, Role, RoleSet, Speed, Targets};
use crate::core::error::{EngineError, Result};
use crate::core::types::CardId;

/// Elixir assumed for cards missing from the catalog
pub const UNKNOWN_CARD_COST: f32 = 4.0;

/// Base stats and role tags for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    pub id: CardId,
    pub cost: u8,
    pub roles: RoleSet,
    #[serde(default)]
    pub kind: CardKind,
    #[serde(default)]
    pub air: bool,
    #[serde(default)]
    pub speed: Speed,
    #[serde(default)]
    pub targets: Targets,
}

impl CardStats {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_fast(&self) -> bool {
        matches!(self.speed, Speed::Fast | Speed::VeryFast)
    }

    pub fn is_spell(&self) -> bool {
        self.kind == CardKind::Spell
    }

    pub fn elixir(&self) -> f32 {
        self.cost as f32
    }

    pub fn threat_class(&self) -> ThreatClass {
        ThreatClass::of(self)
    }
}

/// Catalog file layout (TOML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub cards: Vec<CardStats>,
    pub combos: Vec<ComboDefinition>,
    pub counters: CounterTable,
    pub archetypes: Vec<ArchetypeSignature>,
}

#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: AHashMap<CardId, CardStats>,
    combos: Vec<ComboDefinition>,
    counters: CounterTable,
    archetypes: Vec<ArchetypeSignature>,
    /// Cards in insertion order, for deterministic iteration
    order: Vec<CardId>,
}

impl CardCatalog {
    pub fn from_data(data: CatalogData) -> Self {
        let mut catalog = CardCatalog {
            combos: data.combos,
            counters: data.counters,
            archetypes: data.archetypes,
            ..Default::default()
        };
        for card in data.cards {
            catalog.insert_card(card);
        }
        catalog
    }

    /// Parse and validate a catalog from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let data: CatalogData = toml::from_str(contents)?;
        let catalog = Self::from_data(data);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn insert_card(&mut self, card: CardStats) {
        if !self.cards.contains_key(&card.id) {
            self.order.push(card.id.clone());
        }
        self.cards.insert(card.id.clone(), card);
    }

    pub fn add_combo(&mut self, combo: ComboDefinition) {
        self.combos.push(combo);
    }

    pub fn set_counters(&mut self, counters: CounterTable) {
        self.counters = counters;
    }

    pub fn set_archetypes(&mut self, archetypes: Vec<ArchetypeSignature>) {
        self.archetypes = archetypes;
    }

    pub fn get(&self, id: &CardId) -> Option<&CardStats> {
        self.cards.get(id)
    }

    pub fn stats(&self, id: &CardId) -> Result<&CardStats> {
        self.cards
            .get(id)
            .ok_or_else(|| EngineError::UnknownCard(id.clone()))
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Elixir cost; unknown cards are assumed mid-cost
    pub fn cost(&self, id: &CardId) -> f32 {
        self.cards
            .get(id)
            .map(CardStats::elixir)
            .unwrap_or(UNKNOWN_CARD_COST)
    }

    /// Role tags; unknown cards are treated as support
    pub fn roles(&self, id: &CardId) -> RoleSet {
        self.cards
            .get(id)
            .map(|c| c.roles)
            .unwrap_or_else(|| RoleSet::of(&[Role::Support]))
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardStats> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    pub fn combos(&self) -> &[ComboDefinition] {
        &self.combos
    }

    pub fn counters(&self) -> &CounterTable {
        &self.counters
    }

    pub fn archetypes(&self) -> &[ArchetypeSignature] {
        &self.archetypes
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Check catalog consistency
    ///
    /// Combo names are unique, every referenced card exists, and each combo
    /// has one non-negative, non-decreasing delay per card.
    pub fn validate(&self) -> Result<()> {
        let mut names = AHashSet::new();
        for combo in &self.combos {
            if !names.insert(combo.name.as_str()) {
                return Err(EngineError::Catalog(format!(
                    "duplicate combo name '{}'",
                    combo.name
                )));
            }

            if combo.is_empty() {
                return Err(EngineError::Catalog(format!(
                    "combo '{}' has no cards",
                    combo.name
                )));
            }

            if combo.delays.len() != combo.cards.len() {
                return Err(EngineError::Catalog(format!(
                    "combo '{}' has {} cards but {} delays",
                    combo.name,
                    combo.cards.len(),
                    combo.delays.len()
                )));
            }

            let ordered = combo.delays.windows(2).all(|w| w[0] <= w[1]);
            if !ordered || combo.delays.iter().any(|d| !d.is_finite() || *d < 0.0) {
                return Err(EngineError::Catalog(format!(
                    "combo '{}' delays must be non-negative and non-decreasing",
                    combo.name
                )));
            }

            if !(0.0..=1.0).contains(&combo.effectiveness) {
                return Err(EngineError::Catalog(format!(
                    "combo '{}' effectiveness {} outside [0, 1]",
                    combo.name, combo.effectiveness
                )));
            }

            if let Some(card) = combo.cards.iter().find(|c| !self.contains(c)) {
                return Err(EngineError::Catalog(format!(
                    "combo '{}' references unknown card '{}'",
                    combo.name, card
                )));
            }
        }

        if let Some(card) = self.counters.all_cards().find(|c| !self.contains(c)) {
            return Err(EngineError::Catalog(format!(
                "counter table references unknown card '{}'",
                card
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::combos::ComboTrigger;

    #[test]
    fn test_standard_catalog_validates() {
        let catalog = CardCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert!(catalog.len() > 40);
    }

    #[test]
    fn test_unknown_card_defaults() {
        let catalog = CardCatalog::standard();
        let unknown = CardId::from("not_a_card");
        assert_eq!(catalog.cost(&unknown), UNKNOWN_CARD_COST);
        assert!(catalog.roles(&unknown).contains(Role::Support));
        assert!(matches!(
            catalog.stats(&unknown),
            Err(EngineError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_duplicate_combo_name_rejected() {
        let mut catalog = CardCatalog::standard();
        let first = catalog.combos()[0].clone();
        catalog.add_combo(first);
        assert!(matches!(catalog.validate(), Err(EngineError::Catalog(_))));
    }

    #[test]
    fn test_combo_with_unknown_card_rejected() {
        let mut catalog = CardCatalog::standard();
        catalog.add_combo(ComboDefinition {
            name: "ghost".into(),
            cards: vec![CardId::from("giant"), CardId::from("phantom")],
            delays: vec![0.0, 1.0],
            trigger: ComboTrigger::Always,
            effectiveness: 0.5,
            placement: Default::default(),
        });
        assert!(matches!(catalog.validate(), Err(EngineError::Catalog(_))));
    }

    #[test]
    fn test_mismatched_delays_rejected() {
        let mut catalog = CardCatalog::standard();
        catalog.add_combo(ComboDefinition {
            name: "short".into(),
            cards: vec![CardId::from("giant"), CardId::from("musketeer")],
            delays: vec![0.0],
            trigger: ComboTrigger::Always,
            effectiveness: 0.5,
            placement: Default::default(),
        });
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = CardCatalog::from_toml_str(
            r#"
            [[cards]]
            id = "giant"
            cost = 5
            roles = ["tank", "win_condition"]
            speed = "slow"
            targets = "buildings"

            [[cards]]
            id = "musketeer"
            cost = 4
            roles = ["support"]
            targets = "air_ground"

            [[combos]]
            name = "giant_musketeer"
            cards = ["giant", "musketeer"]
            delays = [0.0, 2.0]
            effectiveness = 0.8
            trigger = { own_elixir_at_least = 9.0 }

            [[counters]]
            threat = "tank"
            cards = ["musketeer"]
            "#,
        )
        .expect("catalog should parse");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.cost(&CardId::from("giant")), 5.0);
        assert_eq!(catalog.combos()[0].trigger, ComboTrigger::OwnElixirAtLeast(9.0));
        assert_eq!(
            catalog.counters().counters(ThreatClass::Tank),
            &[CardId::from("musketeer")]
        );
    }

    #[test]
    fn test_catalog_toml_with_unknown_counter_fails() {
        let result = CardCatalog::from_toml_str(
            r#"
            [[counters]]
            threat = "swarm"
            cards = ["zap"]
            "#,
        );
        assert!(result.is_err());
    }
}

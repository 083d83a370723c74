//! Built-in catalog data

use crate::cards::archetypes::{Archetype, ArchetypeSignature, CardTrait, TraitRequirement};
use crate::cards::catalog::{CardCatalog, CardStats};
use crate::cards::combos::{ComboDefinition, ComboPlacement, ComboTrigger};
use crate::cards::counters::{CounterTable, ThreatClass};
use crate::cards::roles::{CardKind, Role, RoleSet, Speed, Targets};
use crate::core::types::CardId;

use CardKind::{Building, Troop};
use Role::*;
use Speed::*;

fn card(
    id: &str,
    cost: u8,
    roles: &[Role],
    kind: CardKind,
    air: bool,
    speed: Speed,
    targets: Targets,
) -> CardStats {
    CardStats {
        id: CardId::from(id),
        cost,
        roles: RoleSet::of(roles),
        kind,
        air,
        speed,
        targets,
    }
}

fn ids(names: &[&str]) -> Vec<CardId> {
    names.iter().map(|n| CardId::from(*n)).collect()
}

fn standard_cards() -> Vec<CardStats> {
    use Targets::{AirGround, Buildings, Ground};

    vec![
        // Win conditions and tanks
        card("giant", 5, &[Tank, WinCondition], Troop, false, Slow, Buildings),
        card("golem", 8, &[Tank, WinCondition], Troop, false, Slow, Buildings),
        card("royal_giant", 6, &[Tank, WinCondition], Troop, false, Slow, Buildings),
        card("electro_giant", 7, &[Tank, WinCondition], Troop, false, Slow, Buildings),
        card("pekka", 7, &[Tank, WinCondition], Troop, false, Slow, Ground),
        card("mega_knight", 7, &[Tank, WinCondition], Troop, false, Medium, Ground),
        card("lava_hound", 7, &[Tank, WinCondition], Troop, true, Slow, Buildings),
        card("giant_skeleton", 6, &[Tank, Defense], Troop, false, Medium, Ground),
        card("ice_golem", 2, &[Tank, Cycle], Troop, false, Slow, Buildings),
        card("knight", 3, &[Tank, Cycle], Troop, false, Medium, Ground),
        card("valkyrie", 4, &[Tank, Defense], Troop, false, Medium, Ground),
        card("hog_rider", 4, &[WinCondition], Troop, false, VeryFast, Buildings),
        card("ram_rider", 5, &[WinCondition], Troop, false, Fast, Buildings),
        card("battle_ram", 4, &[WinCondition], Troop, false, Fast, Buildings),
        card("royal_hogs", 5, &[WinCondition, Swarm], Troop, false, Fast, Buildings),
        card("balloon", 5, &[WinCondition], Troop, true, Medium, Buildings),
        card("miner", 3, &[WinCondition, Cycle], Troop, false, Fast, Ground),
        card("prince", 5, &[WinCondition, Support], Troop, false, Fast, Ground),
        card("goblin_barrel", 3, &[WinCondition, Spell, Swarm], CardKind::Spell, false, Medium, Ground),
        card("x_bow", 6, &[WinCondition, Defense], Building, false, Static, Ground),
        card("mortar", 4, &[WinCondition, Defense], Building, false, Static, Ground),
        // Support
        card("musketeer", 4, &[Support], Troop, false, Medium, AirGround),
        card("archers", 3, &[Support, Cycle], Troop, false, Medium, AirGround),
        card("wizard", 5, &[Support], Troop, false, Medium, AirGround),
        card("baby_dragon", 4, &[Support], Troop, true, Fast, AirGround),
        card("electro_wizard", 4, &[Support], Troop, false, Fast, AirGround),
        card("ice_wizard", 3, &[Support, Defense], Troop, false, Medium, AirGround),
        card("princess", 3, &[Support], Troop, false, Medium, AirGround),
        card("night_witch", 4, &[Support], Troop, false, Medium, Ground),
        card("bomber", 2, &[Support], Troop, false, Medium, Ground),
        card("dart_goblin", 3, &[Support, Cycle], Troop, false, VeryFast, AirGround),
        card("hunter", 4, &[Support, Defense], Troop, false, Medium, AirGround),
        card("dark_prince", 4, &[Support, Defense], Troop, false, Medium, Ground),
        card("mini_pekka", 4, &[Defense, Support], Troop, false, Fast, Ground),
        card("mega_minion", 3, &[Support, Defense], Troop, true, Medium, AirGround),
        card("inferno_dragon", 4, &[Defense, Support], Troop, true, Medium, AirGround),
        // Defensive buildings
        card("cannon", 3, &[Defense, Cycle], Building, false, Static, Ground),
        card("tesla", 4, &[Defense], Building, false, Static, AirGround),
        card("inferno_tower", 5, &[Defense], Building, false, Static, AirGround),
        card("bomb_tower", 4, &[Defense], Building, false, Static, Ground),
        card("tombstone", 3, &[Defense, Cycle], Building, false, Static, Ground),
        card("goblin_hut", 5, &[Defense], Building, false, Static, Ground),
        // Spells
        card("fireball", 4, &[Spell], CardKind::Spell, false, Static, AirGround),
        card("arrows", 3, &[Spell, Cycle], CardKind::Spell, false, Static, AirGround),
        card("zap", 2, &[Spell, Cycle], CardKind::Spell, false, Static, AirGround),
        card("the_log", 2, &[Spell, Cycle], CardKind::Spell, false, Static, Ground),
        card("poison", 4, &[Spell], CardKind::Spell, false, Static, AirGround),
        card("lightning", 6, &[Spell], CardKind::Spell, false, Static, AirGround),
        card("rocket", 6, &[Spell], CardKind::Spell, false, Static, AirGround),
        card("freeze", 4, &[Spell], CardKind::Spell, false, Static, AirGround),
        card("tornado", 3, &[Spell, Defense], CardKind::Spell, false, Static, AirGround),
        // Swarms and cycle
        card("skeletons", 1, &[Swarm, Cycle], Troop, false, Fast, Ground),
        card("ice_spirit", 1, &[Cycle], Troop, false, VeryFast, AirGround),
        card("electro_spirit", 1, &[Cycle], Troop, false, VeryFast, AirGround),
        card("heal_spirit", 1, &[Cycle], Troop, false, VeryFast, AirGround),
        card("goblins", 2, &[Swarm, Cycle], Troop, false, VeryFast, Ground),
        card("skeleton_army", 3, &[Swarm, Defense], Troop, false, Fast, Ground),
        card("goblin_gang", 3, &[Swarm, Cycle], Troop, false, VeryFast, AirGround),
        card("barbarians", 5, &[Swarm, Defense], Troop, false, Medium, Ground),
        card("guards", 3, &[Swarm, Defense], Troop, false, Fast, Ground),
        card("bats", 2, &[Swarm, Cycle], Troop, true, VeryFast, AirGround),
        card("minions", 3, &[Swarm, Support], Troop, true, Fast, AirGround),
        card("minion_horde", 5, &[Swarm], Troop, true, Fast, AirGround),
    ]
}

fn standard_combos() -> Vec<ComboDefinition> {
    vec![
        ComboDefinition {
            name: "giant_musketeer".into(),
            cards: ids(&["giant", "musketeer"]),
            delays: vec![0.0, 2.0],
            trigger: ComboTrigger::OwnElixirAtLeast(9.0),
            effectiveness: 0.8,
            placement: ComboPlacement::Behind,
        },
        ComboDefinition {
            name: "giant_bomber".into(),
            cards: ids(&["giant", "bomber"]),
            delays: vec![0.0, 1.5],
            trigger: ComboTrigger::OwnElixirAtLeast(7.0),
            effectiveness: 0.7,
            placement: ComboPlacement::Behind,
        },
        ComboDefinition {
            name: "hog_ice_spirit".into(),
            cards: ids(&["hog_rider", "ice_spirit"]),
            delays: vec![0.0, 0.5],
            trigger: ComboTrigger::All(vec![
                ComboTrigger::OwnElixirAtLeast(5.0),
                ComboTrigger::EnemyElixirBelow(5.0),
            ]),
            effectiveness: 0.9,
            placement: ComboPlacement::Ahead,
        },
        ComboDefinition {
            name: "golem_night_witch".into(),
            cards: ids(&["golem", "night_witch", "baby_dragon"]),
            delays: vec![0.0, 3.0, 5.0],
            trigger: ComboTrigger::All(vec![
                ComboTrigger::OwnElixirAtLeast(10.0),
                ComboTrigger::ElixirAdvantageAtLeast(2.0),
            ]),
            effectiveness: 0.6,
            placement: ComboPlacement::Behind,
        },
        ComboDefinition {
            name: "xbow_tesla".into(),
            cards: ids(&["x_bow", "tesla"]),
            delays: vec![0.0, 1.0],
            trigger: ComboTrigger::All(vec![
                ComboTrigger::OwnElixirAtLeast(10.0),
                ComboTrigger::NoEnemyTanks,
            ]),
            effectiveness: 0.7,
            placement: ComboPlacement::Beside,
        },
        ComboDefinition {
            name: "lavaloon".into(),
            cards: ids(&["lava_hound", "balloon"]),
            delays: vec![0.0, 4.0],
            trigger: ComboTrigger::OwnElixirAtLeast(10.0),
            effectiveness: 0.8,
            placement: ComboPlacement::Behind,
        },
        ComboDefinition {
            name: "princess_goblin_barrel".into(),
            cards: ids(&["princess", "goblin_barrel"]),
            delays: vec![0.0, 1.0],
            trigger: ComboTrigger::ElixirAdvantageAtLeast(2.0),
            effectiveness: 0.65,
            placement: ComboPlacement::EnemyTower,
        },
    ]
}

fn standard_counters() -> CounterTable {
    let mut table = CounterTable::new();
    table.insert(
        ThreatClass::Tank,
        ids(&[
            "inferno_tower", "inferno_dragon", "pekka", "mini_pekka", "cannon", "tesla",
            "skeleton_army", "tombstone", "barbarians", "hunter", "minion_horde",
        ]),
    );
    table.insert(
        ThreatClass::FastWinCondition,
        ids(&[
            "cannon", "tesla", "tombstone", "bomb_tower", "mini_pekka", "valkyrie",
            "ice_golem", "knight", "guards", "skeletons",
        ]),
    );
    table.insert(
        ThreatClass::AirWinCondition,
        ids(&[
            "musketeer", "tesla", "inferno_tower", "archers", "minions", "inferno_dragon",
            "mega_minion", "hunter", "wizard", "electro_wizard", "baby_dragon", "bats",
        ]),
    );
    table.insert(
        ThreatClass::BuildingTargeter,
        ids(&["cannon", "tesla", "tombstone", "inferno_tower", "mini_pekka", "skeleton_army", "goblins"]),
    );
    table.insert(
        ThreatClass::Swarm,
        ids(&[
            "the_log", "zap", "arrows", "valkyrie", "wizard", "baby_dragon", "bomber",
            "bomb_tower", "tornado", "fireball",
        ]),
    );
    table.insert(
        ThreatClass::Air,
        ids(&[
            "musketeer", "archers", "wizard", "baby_dragon", "minions", "electro_wizard",
            "arrows", "tesla", "mega_minion",
        ]),
    );
    table.insert(
        ThreatClass::Siege,
        ids(&["rocket", "lightning", "giant", "knight", "valkyrie", "miner", "hog_rider", "fireball"]),
    );
    table.insert(
        ThreatClass::Support,
        ids(&["fireball", "poison", "lightning", "mini_pekka", "knight", "valkyrie", "minions", "electro_spirit"]),
    );
    table.insert(
        ThreatClass::Other,
        ids(&["knight", "valkyrie", "mini_pekka", "musketeer", "archers", "skeletons", "ice_spirit", "goblins"]),
    );
    table
}

fn requirement(traits: &[CardTrait], min: usize) -> TraitRequirement {
    TraitRequirement {
        traits: traits.to_vec(),
        min,
    }
}

fn standard_archetypes() -> Vec<ArchetypeSignature> {
    vec![
        ArchetypeSignature {
            archetype: Archetype::Siege,
            requirements: vec![requirement(
                &[CardTrait::Role(WinCondition), CardTrait::Kind(Building)],
                1,
            )],
        },
        ArchetypeSignature {
            archetype: Archetype::AirAttack,
            requirements: vec![
                requirement(&[CardTrait::Role(WinCondition), CardTrait::Air], 1),
                requirement(&[CardTrait::Air], 2),
            ],
        },
        ArchetypeSignature {
            archetype: Archetype::Beatdown,
            requirements: vec![
                requirement(
                    &[CardTrait::Role(Tank), CardTrait::Role(WinCondition), CardTrait::MinCost(5)],
                    1,
                ),
                requirement(&[CardTrait::Role(Support)], 1),
            ],
        },
        ArchetypeSignature {
            archetype: Archetype::SpellBait,
            requirements: vec![
                requirement(&[CardTrait::Role(Swarm)], 2),
                requirement(&[CardTrait::Role(WinCondition), CardTrait::Kind(CardKind::Spell)], 1),
            ],
        },
        ArchetypeSignature {
            archetype: Archetype::BridgeSpam,
            requirements: vec![requirement(&[CardTrait::Fast, CardTrait::MinCost(3)], 2)],
        },
    ]
}

impl CardCatalog {
    /// Built-in catalog
    pub fn standard() -> Self {
        let mut catalog = CardCatalog::default();
        for stats in standard_cards() {
            catalog.insert_card(stats);
        }
        for combo in standard_combos() {
            catalog.add_combo(combo);
        }
        catalog.set_counters(standard_counters());
        catalog.set_archetypes(standard_archetypes());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_card_ids_unique() {
        let cards = standard_cards();
        let mut names: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), cards.len());
    }

    #[test]
    fn test_every_combo_starts_at_zero() {
        for combo in standard_combos() {
            assert_eq!(combo.delays[0], 0.0, "{} should open immediately", combo.name);
        }
    }
}

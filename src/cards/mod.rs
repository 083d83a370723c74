//! Card catalog and role classifier
//!
//! Static data consumed by the decision subsystems: card stats and role
//! tags, named combos, the counter table and opponent archetype signatures.

pub mod archetypes;
pub mod catalog;
pub mod combos;
pub mod counters;
pub mod roles;
mod standard;

pub use archetypes::{Archetype, ArchetypeSignature, CardTrait, TraitRequirement};
pub use catalog::{CardCatalog, CardStats, CatalogData};
pub use combos::{ComboDefinition, ComboPlacement, ComboTrigger};
pub use counters::{CounterTable, ThreatClass};
pub use roles::{CardKind, Role, RoleSet, Speed, Targets};

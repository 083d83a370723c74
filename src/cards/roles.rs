//! Card role tags and physical traits

use serde::{Deserialize, Serialize};

/// Strategic role a card can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Support,
    WinCondition,
    Defense,
    Spell,
    Swarm,
    Cycle,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Tank,
        Role::Support,
        Role::WinCondition,
        Role::Defense,
        Role::Spell,
        Role::Swarm,
        Role::Cycle,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(u8);

impl RoleSet {
    pub fn of(roles: &[Role]) -> Self {
        let mut set = Self::default();
        for role in roles {
            set.insert(*role);
        }
        set
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self::of(&roles)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.iter().collect()
    }
}

/// What a card deploys as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    #[default]
    Troop,
    Building,
    Spell,
}

/// Movement speed class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Static,
    Slow,
    #[default]
    Medium,
    Fast,
    VeryFast,
}

/// What a unit attacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Targets {
    #[default]
    Ground,
    Air,
    AirGround,
    Buildings,
}

impl Targets {
    pub fn hits_air(&self) -> bool {
        matches!(self, Targets::Air | Targets::AirGround)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_set_membership() {
        let set = RoleSet::of(&[Role::Tank, Role::WinCondition]);
        assert!(set.contains(Role::Tank));
        assert!(set.contains(Role::WinCondition));
        assert!(!set.contains(Role::Spell));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_role_set_serializes_as_list() {
        let set = RoleSet::of(&[Role::Cycle, Role::Spell]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[\"spell\",\"cycle\"]");
        let back: RoleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}

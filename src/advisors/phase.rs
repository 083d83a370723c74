//! Phase controller: match time to phase and phase-scoped modifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advisors::positioning::Intent;
use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::{Role, RoleSet};
use crate::core::types::Seconds;
use crate::fusion::{ActionRecommendation, Rationale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Early,
    Mid,
    Late,
    Overtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Early => "early",
            Phase::Mid => "mid",
            Phase::Late => "late",
            Phase::Overtime => "overtime",
        };
        f.write_str(label)
    }
}

/// Phase boundaries in seconds
const MID_STARTS: Seconds = 60.0;
const LATE_STARTS: Seconds = 180.0;
const OVERTIME_STARTS: Seconds = 300.0;

pub fn phase_for(elapsed: Seconds) -> Phase {
    if elapsed < MID_STARTS {
        Phase::Early
    } else if elapsed < LATE_STARTS {
        Phase::Mid
    } else if elapsed < OVERTIME_STARTS {
        Phase::Late
    } else {
        Phase::Overtime
    }
}

/// Card value multiplier per role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleMultipliers {
    pub tank: f32,
    pub support: f32,
    pub win_condition: f32,
    pub defense: f32,
    pub spell: f32,
    pub swarm: f32,
    pub cycle: f32,
}

impl RoleMultipliers {
    pub fn get(&self, role: Role) -> f32 {
        match role {
            Role::Tank => self.tank,
            Role::Support => self.support,
            Role::WinCondition => self.win_condition,
            Role::Defense => self.defense,
            Role::Spell => self.spell,
            Role::Swarm => self.swarm,
            Role::Cycle => self.cycle,
        }
    }

    /// Largest multiplier over a card's roles, 1.0 for an untagged card
    pub fn best_for(&self, roles: RoleSet) -> f32 {
        roles.iter().map(|r| self.get(r)).reduce(f32::max).unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseModifiers {
    /// 0.0 (fully conservative) to 1.0 (all-in)
    pub aggression: f32,
    pub card_value: RoleMultipliers,
}

pub fn modifiers_for(phase: Phase) -> PhaseModifiers {
    match phase {
        Phase::Early => PhaseModifiers {
            aggression: 0.3,
            card_value: RoleMultipliers {
                tank: 0.8,
                support: 1.0,
                win_condition: 0.8,
                defense: 1.2,
                spell: 0.9,
                swarm: 1.0,
                cycle: 1.2,
            },
        },
        Phase::Mid => PhaseModifiers {
            aggression: 0.6,
            card_value: RoleMultipliers {
                tank: 1.0,
                support: 1.0,
                win_condition: 1.1,
                defense: 1.0,
                spell: 1.0,
                swarm: 1.0,
                cycle: 1.0,
            },
        },
        Phase::Late => PhaseModifiers {
            aggression: 0.8,
            card_value: RoleMultipliers {
                tank: 1.1,
                support: 1.0,
                win_condition: 1.2,
                defense: 1.0,
                spell: 1.1,
                swarm: 1.0,
                cycle: 0.9,
            },
        },
        Phase::Overtime => PhaseModifiers {
            aggression: 1.0,
            card_value: RoleMultipliers {
                tank: 1.2,
                support: 1.0,
                win_condition: 1.4,
                defense: 0.9,
                spell: 1.3,
                swarm: 1.0,
                cycle: 0.8,
            },
        },
    }
}

/// Phase-driven recommendations; holds no match state
#[derive(Debug, Clone)]
pub struct PhaseController {
    max_elixir: f32,
}

impl PhaseController {
    pub fn new(max_elixir: f32) -> Self {
        Self { max_elixir }
    }
}

impl Advisor for PhaseController {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::PhaseControl
    }

    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        match ctx.phase {
            Phase::Early if ctx.snapshot.own_elixir < self.max_elixir - 1.0 => {
                vec![ActionRecommendation::wait(
                    AdvisorKind::PhaseControl,
                    0.4,
                    Rationale::EarlyConservation,
                )]
            }
            Phase::Overtime => {
                let mut finishers: Vec<_> = ctx
                    .playable()
                    .filter(|c| c.has_role(Role::WinCondition))
                    .collect();
                finishers.sort_by(|a, b| b.cost.cmp(&a.cost).then_with(|| a.id.cmp(&b.id)));

                finishers
                    .first()
                    .and_then(|card| {
                        let target = ctx.positioning.position_for(card, Intent::Offensive, ctx.snapshot)?;
                        Some(ActionRecommendation::play(
                            AdvisorKind::PhaseControl,
                            card.id.clone(),
                            target,
                            Intent::Offensive,
                            0.7,
                            Rationale::OvertimePush,
                        ))
                    })
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}
